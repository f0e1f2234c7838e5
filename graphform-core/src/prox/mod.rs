//! Proximal operator library.
//!
//! [`kernels`] holds the closed-form scalar prox and evaluation for each
//! base function; this module layers the affine/quadratic composition of
//! [`FunctionObj`] on top and applies whole function sequences to vectors.
//!
//! # Composition rule
//!
//! For `φ(x) = c·h(a·x − b) + d·x + (e/2)·x²` and penalty ρ, substituting
//! `z = a·x − b` reduces `prox_{φ/ρ}` to a base prox with shifted input
//! and adjusted penalty:
//!
//! ```text
//! u  = a·(v·ρ − d)/(ρ + e) − b
//! λ' = (ρ + e)/(c·a²)
//! x* = (base_prox(h, λ', u) + b)/a
//! ```
//!
//! The same transformation serves every catalog entry, so each base
//! kernel only ever sees its canonical form.

pub mod kernels;

use rayon::prelude::*;

use crate::problem::FunctionObj;
use crate::scalar::Scalar;
use crate::util::numerics::cast;

pub use kernels::{base_eval, base_prox};

impl<T: Scalar> FunctionObj<T> {
    /// `argmin_x φ(x) + (ρ/2)(x − v)²` via the composition rule.
    pub fn prox(&self, rho: T, v: T) -> T {
        let rho_e = rho + self.e;
        let u = self.a * (v * rho - self.d) / rho_e - self.b;
        if self.c == T::zero() {
            // c = 0 drops the h term; what is left is a quadratic with an
            // explicit minimizer.
            return (u + self.b) / self.a;
        }
        let lambda = rho_e / (self.c * self.a * self.a);
        (base_prox(self.h, lambda, u) + self.b) / self.a
    }

    /// `φ(x) = c·h(a·x − b) + d·x + (e/2)·x²`.
    pub fn eval(&self, x: T) -> T {
        self.c * base_eval(self.h, self.a * x - self.b)
            + self.d * x
            + cast::<T>(0.5) * self.e * x * x
    }
}

/// Apply one prox per coordinate: `out[i] = prox_{objs[i]/ρ}(v[i])`.
///
/// The coordinates are independent, so the loop is a work-sharing
/// parallel-for. Ordering between coordinates is not observable.
pub fn prox_step<T: Scalar>(objs: &[FunctionObj<T>], rho: T, v: &[T], out: &mut [T]) {
    debug_assert_eq!(objs.len(), v.len());
    debug_assert_eq!(objs.len(), out.len());

    out.par_iter_mut()
        .zip(objs.par_iter().zip(v.par_iter()))
        .for_each(|(o, (obj, &vi))| {
            *o = obj.prox(rho, vi);
        });
}

/// `Σᵢ φᵢ(xᵢ)` for a separable function over a vector.
pub fn eval_separable<T: Scalar>(objs: &[FunctionObj<T>], x: &[T]) -> T {
    debug_assert_eq!(objs.len(), x.len());
    objs.iter()
        .zip(x.iter())
        .map(|(obj, &xi)| obj.eval(xi))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::FunctionKind;

    #[test]
    fn test_prox_square_with_offset() {
        // φ(x) = ½(x − 1)²; prox = (ρv + 1)/(1 + ρ).
        let obj = FunctionObj::new(FunctionKind::Square).with_b(1.0);
        let x: f64 = obj.prox(2.0, 0.0);
        assert!((x - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_prox_weighted_abs_is_scaled_soft_threshold() {
        // φ(x) = 0.5·|x|; threshold at 0.5/ρ.
        let obj = FunctionObj::new(FunctionKind::Abs).with_c(0.5);
        let x: f64 = obj.prox(1.0, 0.8);
        assert!((x - 0.3).abs() < 1e-15);
        let x = obj.prox(1.0, -0.2);
        assert_eq!(x, 0.0);
    }

    #[test]
    fn test_prox_affine_indicator_projection() {
        // φ(x) = I(2x − 1 ≥ 0): projection onto x ≥ 1/2.
        let obj = FunctionObj::new(FunctionKind::IndGe0).with_a(2.0).with_b(1.0);
        let x0: f64 = obj.prox(1.0, 0.0);
        assert!((x0 - 0.5).abs() < 1e-15);
        let x1: f64 = obj.prox(1.0, 3.0);
        assert!((x1 - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_prox_linear_term_shift() {
        // φ(x) = d·x over the Zero kind: prox = v − d/ρ.
        let obj = FunctionObj::new(FunctionKind::Zero).with_d(3.0);
        let x: f64 = obj.prox(2.0, 1.0);
        assert!((x - (1.0 - 1.5)).abs() < 1e-15);
    }

    #[test]
    fn test_prox_zero_weight_ignores_h() {
        // c = 0 leaves only d·x + (e/2)x²: minimizer (ρv − d)/(ρ + e).
        let obj = FunctionObj::new(FunctionKind::NegLog)
            .with_c(0.0)
            .with_d(1.0)
            .with_e(1.0);
        let x: f64 = obj.prox(1.0, 4.0);
        assert!((x - 1.5).abs() < 1e-15);
    }

    #[test]
    fn test_prox_negative_inner_scale() {
        // φ(x) = I(−x ≥ 0) = I(x ≤ 0) expressed through a = −1.
        let obj = FunctionObj::new(FunctionKind::IndGe0).with_a(-1.0);
        assert_eq!(obj.prox(1.0, 2.0), 0.0);
        assert_eq!(obj.prox(1.0, -2.0), -2.0);
    }

    #[test]
    fn test_eval_composition() {
        // φ(x) = 2·|3x − 1| + 0.5·x + x².
        let obj = FunctionObj::new(FunctionKind::Abs)
            .with_a(3.0)
            .with_b(1.0)
            .with_c(2.0)
            .with_d(0.5)
            .with_e(2.0);
        let x: f64 = 1.0;
        assert!((obj.eval(x) - (2.0 * 2.0 + 0.5 + 1.0)).abs() < 1e-15);
    }

    #[test]
    fn test_prox_step_matches_scalar() {
        let objs = vec![
            FunctionObj::new(FunctionKind::Abs),
            FunctionObj::new(FunctionKind::Square).with_b(1.0),
            FunctionObj::new(FunctionKind::IndGe0),
        ];
        let v = vec![2.0, 0.0, -1.0];
        let mut out = vec![0.0; 3];
        prox_step(&objs, 1.0, &v, &mut out);
        for i in 0..3 {
            assert_eq!(out[i], objs[i].prox(1.0, v[i]));
        }
    }

    #[test]
    fn test_eval_separable_sums() {
        let objs = vec![
            FunctionObj::new(FunctionKind::Square),
            FunctionObj::new(FunctionKind::Abs),
        ];
        let x: Vec<f64> = vec![2.0, -3.0];
        assert!((eval_separable(&objs, &x) - 5.0).abs() < 1e-15);
    }
}
