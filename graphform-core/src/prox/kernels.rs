//! Closed-form scalar prox and evaluation kernels.
//!
//! For each base function `h` in the catalog this module computes
//!
//! ```text
//! base_prox(h, λ, v) = argmin_x  h(x) + (λ/2)(x − v)²
//! base_eval(h, x)    = h(x)
//! ```
//!
//! Every kernel is a handful of arithmetic ops behind one `match`; the
//! per-coordinate dispatch stays branch-predictable with no indirect
//! calls. All kernels are stable for λ spanning at least [1e-6, 1e6].
//!
//! `LogExp` has no closed form; it uses a Newton iteration safeguarded by
//! a bisection bracket that always contains the root, so it cannot
//! diverge.

use crate::problem::FunctionKind;
use crate::scalar::Scalar;
use crate::util::numerics::{cast, indicator_tol, sigmoid};

/// Prox of the logistic loss `log(1 + eˣ)` with penalty λ.
///
/// Solves `λ(x − v) + σ(x) = 0`. The root always lies in
/// `[v − 1/λ, v]`: the residual is `σ(v) > 0` at the right end and
/// `σ − 1 < 0` at the left end. Newton steps are taken when they stay
/// inside the current bracket and replaced by bisection otherwise.
fn prox_logexp<T: Scalar>(lambda: T, v: T) -> T {
    let mut lo = v - lambda.recip();
    let mut hi = v;
    let mut x = v;

    let tol = cast::<T>(4.0) * T::epsilon() * (T::one() + lambda);
    for _ in 0..64 {
        let s = sigmoid(x);
        let r = lambda * (x - v) + s;
        if r.abs() <= tol {
            return x;
        }
        if r > T::zero() {
            hi = x;
        } else {
            lo = x;
        }

        let dr = lambda + s * (T::one() - s);
        let newton = x - r / dr;
        x = if newton > lo && newton < hi {
            newton
        } else {
            cast::<T>(0.5) * (lo + hi)
        };

        if hi - lo <= T::epsilon() * hi.abs().max(T::one()) {
            return x;
        }
    }
    x
}

/// `argmin_x h(x) + (λ/2)(x − v)²` for the base function `h`.
pub fn base_prox<T: Scalar>(h: FunctionKind, lambda: T, v: T) -> T {
    let k = lambda.recip();
    match h {
        FunctionKind::Abs => v.signum() * (v.abs() - k).max(T::zero()),
        FunctionKind::Huber => {
            if v.abs() <= T::one() + k {
                v * lambda / (T::one() + lambda)
            } else {
                v - v.signum() * k
            }
        }
        FunctionKind::Identity => v - k,
        FunctionKind::IndBox01 => v.max(T::zero()).min(T::one()),
        FunctionKind::IndEq0 => T::zero(),
        FunctionKind::IndGe0 => v.max(T::zero()),
        FunctionKind::IndLe0 => v.min(T::zero()),
        FunctionKind::NegLog => {
            // Positive root of x² − v·x − 1/λ = 0; the conjugate form keeps
            // the negative-v branch free of cancellation.
            let disc = (v * v + cast::<T>(4.0) * k).sqrt();
            if v >= T::zero() {
                cast::<T>(0.5) * (v + disc)
            } else {
                cast::<T>(2.0) * k / (disc - v)
            }
        }
        FunctionKind::LogExp => prox_logexp(lambda, v),
        FunctionKind::MaxNeg0 => {
            if v < -k {
                v + k
            } else if v <= T::zero() {
                T::zero()
            } else {
                v
            }
        }
        FunctionKind::MaxPos0 => {
            if v > k {
                v - k
            } else if v >= T::zero() {
                T::zero()
            } else {
                v
            }
        }
        FunctionKind::Square => v * lambda / (T::one() + lambda),
        FunctionKind::Zero => v,
    }
}

/// `h(x)` for the base function `h`.
///
/// Indicators report `0` within a small tolerance of their domain and
/// `+∞` outside; the value is only used for objective reporting.
pub fn base_eval<T: Scalar>(h: FunctionKind, x: T) -> T {
    let half = cast::<T>(0.5);
    let tol = indicator_tol::<T>();
    match h {
        FunctionKind::Abs => x.abs(),
        FunctionKind::Huber => {
            if x.abs() <= T::one() {
                half * x * x
            } else {
                x.abs() - half
            }
        }
        FunctionKind::Identity => x,
        FunctionKind::IndBox01 => {
            if x >= -tol && x <= T::one() + tol {
                T::zero()
            } else {
                T::infinity()
            }
        }
        FunctionKind::IndEq0 => {
            if x.abs() <= tol {
                T::zero()
            } else {
                T::infinity()
            }
        }
        FunctionKind::IndGe0 => {
            if x >= -tol {
                T::zero()
            } else {
                T::infinity()
            }
        }
        FunctionKind::IndLe0 => {
            if x <= tol {
                T::zero()
            } else {
                T::infinity()
            }
        }
        FunctionKind::NegLog => {
            if x > T::zero() {
                -x.ln()
            } else {
                T::infinity()
            }
        }
        // log(1 + eˣ) = max(x, 0) + log(1 + e^−|x|), stable for large |x|.
        FunctionKind::LogExp => x.max(T::zero()) + (-x.abs()).exp().ln_1p(),
        FunctionKind::MaxNeg0 => (-x).max(T::zero()),
        FunctionKind::MaxPos0 => x.max(T::zero()),
        FunctionKind::Square => half * x * x,
        FunctionKind::Zero => T::zero(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [FunctionKind; 13] = [
        FunctionKind::Abs,
        FunctionKind::Huber,
        FunctionKind::Identity,
        FunctionKind::IndBox01,
        FunctionKind::IndEq0,
        FunctionKind::IndGe0,
        FunctionKind::IndLe0,
        FunctionKind::NegLog,
        FunctionKind::LogExp,
        FunctionKind::MaxNeg0,
        FunctionKind::MaxPos0,
        FunctionKind::Square,
        FunctionKind::Zero,
    ];

    #[test]
    fn test_prox_abs_soft_threshold() {
        assert_eq!(base_prox(FunctionKind::Abs, 1.0, 2.5), 1.5);
        assert_eq!(base_prox(FunctionKind::Abs, 1.0, -2.5), -1.5);
        assert_eq!(base_prox(FunctionKind::Abs, 1.0, 0.5), 0.0);
        assert_eq!(base_prox(FunctionKind::Abs, 2.0, 0.75), 0.25);
    }

    #[test]
    fn test_prox_huber_regions() {
        // Quadratic region: x = v λ/(1+λ).
        let x: f64 = base_prox(FunctionKind::Huber, 1.0, 1.0);
        assert!((x - 0.5).abs() < 1e-15);
        // Linear region: shift by 1/λ.
        let x: f64 = base_prox(FunctionKind::Huber, 1.0, 5.0);
        assert!((x - 4.0).abs() < 1e-15);
        let x: f64 = base_prox(FunctionKind::Huber, 1.0, -5.0);
        assert!((x + 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_prox_projections() {
        assert_eq!(base_prox(FunctionKind::IndBox01, 3.0, 1.7), 1.0);
        assert_eq!(base_prox(FunctionKind::IndBox01, 3.0, -0.2), 0.0);
        assert_eq!(base_prox(FunctionKind::IndBox01, 3.0, 0.4), 0.4);
        assert_eq!(base_prox(FunctionKind::IndEq0, 0.5, 9.0), 0.0);
        assert_eq!(base_prox(FunctionKind::IndGe0, 0.5, -2.0), 0.0);
        assert_eq!(base_prox(FunctionKind::IndGe0, 0.5, 2.0), 2.0);
        assert_eq!(base_prox(FunctionKind::IndLe0, 0.5, 2.0), 0.0);
        assert_eq!(base_prox(FunctionKind::IndLe0, 0.5, -2.0), -2.0);
    }

    #[test]
    fn test_prox_neglog_positive_root() {
        // x* solves x² − v x − 1/λ = 0; always positive.
        for &(lambda, v) in &[(1.0f64, -3.0), (1.0, 3.0), (1e-6, -2.0), (1e6, 0.1)] {
            let x: f64 = base_prox(FunctionKind::NegLog, lambda, v);
            assert!(x > 0.0, "lambda={}, v={} gave {}", lambda, v, x);
            let resid = -1.0 / x + lambda * (x - v);
            assert!(
                resid.abs() <= 1e-8 * lambda.max(1.0),
                "lambda={}, v={}: optimality residual {}",
                lambda,
                v,
                resid
            );
        }
    }

    #[test]
    fn test_prox_logexp_optimality() {
        for &lambda in &[1e-6f64, 1e-3, 1.0, 1e3, 1e6] {
            for &v in &[-30.0f64, -2.0, -0.1, 0.0, 0.1, 2.0, 30.0] {
                let x: f64 = base_prox(FunctionKind::LogExp, lambda, v);
                let resid = sigmoid(x) + lambda * (x - v);
                assert!(
                    resid.abs() <= 1e-8 * lambda.max(1.0),
                    "lambda={}, v={}: optimality residual {}",
                    lambda,
                    v,
                    resid
                );
            }
        }
    }

    #[test]
    fn test_prox_hinges() {
        // MaxPos0: shrink above the threshold, clamp the dead zone, pass negatives.
        assert_eq!(base_prox(FunctionKind::MaxPos0, 2.0, 3.0), 2.5);
        assert_eq!(base_prox(FunctionKind::MaxPos0, 2.0, 0.3), 0.0);
        assert_eq!(base_prox(FunctionKind::MaxPos0, 2.0, -1.0), -1.0);
        // MaxNeg0 mirrors it.
        assert_eq!(base_prox(FunctionKind::MaxNeg0, 2.0, -3.0), -2.5);
        assert_eq!(base_prox(FunctionKind::MaxNeg0, 2.0, -0.3), 0.0);
        assert_eq!(base_prox(FunctionKind::MaxNeg0, 2.0, 1.0), 1.0);
    }

    #[test]
    fn test_prox_square_identity_zero() {
        assert!((base_prox(FunctionKind::Square, 3.0f64, 2.0) - 1.5).abs() < 1e-15);
        assert_eq!(base_prox(FunctionKind::Identity, 4.0, 1.0), 0.75);
        assert_eq!(base_prox(FunctionKind::Zero, 0.1, -7.0), -7.0);
    }

    #[test]
    fn test_prox_finite_across_lambda_range() {
        for &kind in KINDS.iter() {
            for &lambda in &[1e-6f64, 1e-2, 1.0, 1e2, 1e6] {
                for &v in &[-100.0f64, -1.0, 0.0, 0.5, 1.0, 100.0] {
                    let x: f64 = base_prox(kind, lambda, v);
                    assert!(
                        x.is_finite(),
                        "{:?} with lambda={}, v={} gave {}",
                        kind,
                        lambda,
                        v,
                        x
                    );
                }
            }
        }
    }

    #[test]
    fn test_eval_values() {
        assert_eq!(base_eval(FunctionKind::Abs, -2.0), 2.0);
        assert_eq!(base_eval(FunctionKind::Square, 2.0), 2.0);
        assert_eq!(base_eval(FunctionKind::Huber, 0.5), 0.125);
        assert_eq!(base_eval(FunctionKind::Huber, 3.0), 2.5);
        assert_eq!(base_eval(FunctionKind::MaxPos0, -1.0), 0.0);
        assert_eq!(base_eval(FunctionKind::MaxNeg0, -1.0), 1.0);
        assert_eq!(base_eval(FunctionKind::Zero, 9.0), 0.0);
        assert!((base_eval(FunctionKind::LogExp, 0.0) - 2.0f64.ln()).abs() < 1e-15);
    }

    #[test]
    fn test_eval_logexp_large_args() {
        // Naive log(1+e^x) overflows near x = 710; the stable form must not.
        let v: f64 = base_eval(FunctionKind::LogExp, 800.0);
        assert!((v - 800.0).abs() < 1e-9);
        let v: f64 = base_eval(FunctionKind::LogExp, -800.0);
        assert!(v >= 0.0 && v < 1e-300);
    }

    #[test]
    fn test_eval_indicators() {
        assert_eq!(base_eval(FunctionKind::IndGe0, 1.0f64), 0.0);
        assert_eq!(base_eval(FunctionKind::IndGe0, 1e-12f64), 0.0);
        assert!(base_eval(FunctionKind::IndGe0, -1.0f64).is_infinite());
        assert_eq!(base_eval(FunctionKind::IndBox01, 0.5f64), 0.0);
        assert!(base_eval(FunctionKind::IndBox01, 1.5f64).is_infinite());
        assert_eq!(base_eval(FunctionKind::IndEq0, 0.0f64), 0.0);
        assert!(base_eval(FunctionKind::IndEq0, 0.1f64).is_infinite());
        assert!(base_eval(FunctionKind::IndLe0, 0.1f64).is_infinite());
        assert_eq!(base_eval(FunctionKind::IndLe0, -0.1f64), 0.0);
    }

    #[test]
    fn test_eval_neglog_domain() {
        assert!((base_eval(FunctionKind::NegLog, 1.0f64)).abs() < 1e-15);
        assert!(base_eval(FunctionKind::NegLog, 0.0f64).is_infinite());
        assert!(base_eval(FunctionKind::NegLog, -1.0f64).is_infinite());
    }
}
