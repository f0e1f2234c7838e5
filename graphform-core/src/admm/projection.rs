//! Projection onto the graph subspace `{(x, y) : y = A x}`.
//!
//! The Euclidean projection of `(c, d)` has the closed form
//!
//! ```text
//! x = (I + AᵀA)⁻¹ (c + Aᵀd)        y = A x
//! ```
//!
//! When `m < n` the matrix-inversion lemma turns this into an m × m solve:
//!
//! ```text
//! s = c + Aᵀd        x = s − Aᵀ(I + AAᵀ)⁻¹ A s        y = A x
//! ```
//!
//! Whichever Gram matrix is smaller is formed and Cholesky-factored once
//! per solve; every iteration then costs two matrix-vector products and a
//! pair of triangular solves against the cached factor.

use crate::linalg::backend::{FactorizationError, GramShape, LinearBackend};
use crate::linalg::dense::MatrixRef;
use crate::scalar::Scalar;

/// Cached factorization serving the per-iteration projection step.
pub struct GraphProjector<T: Scalar, B: LinearBackend<T>> {
    shape: GramShape,
    factor: B::Factor,
    tmp_n: Vec<T>,
    tmp_m: Vec<T>,
}

impl<T: Scalar, B: LinearBackend<T>> GraphProjector<T, B> {
    /// Build the Gram matrix for the cheaper side and factor it.
    ///
    /// The side is fixed here for the lifetime of the projector; the
    /// factor does not depend on ρ, so it is never rebuilt.
    pub fn new(backend: &B, a: &MatrixRef<'_, T>) -> Result<Self, FactorizationError> {
        let m = a.rows();
        let n = a.cols();
        let shape = if m >= n { GramShape::AtA } else { GramShape::AAt };

        let gram = backend.syrk(a, shape);
        let factor = backend.potrf(gram)?;

        Ok(Self {
            shape,
            factor,
            tmp_n: vec![T::zero(); n],
            tmp_m: vec![T::zero(); m],
        })
    }

    /// Which Gram system this projector factored.
    pub fn shape(&self) -> GramShape {
        self.shape
    }

    /// Project `(c, d)` onto the graph of `A`, writing `x` (length n) and
    /// `y = A x` (length m).
    pub fn project(
        &mut self,
        backend: &B,
        a: &MatrixRef<'_, T>,
        c: &[T],
        d: &[T],
        x: &mut [T],
        y: &mut [T],
    ) {
        debug_assert_eq!(c.len(), a.cols());
        debug_assert_eq!(d.len(), a.rows());
        debug_assert_eq!(x.len(), a.cols());
        debug_assert_eq!(y.len(), a.rows());

        match self.shape {
            GramShape::AtA => {
                // x = (I + AᵀA)⁻¹ (c + Aᵀd)
                x.copy_from_slice(c);
                backend.gemv(true, T::one(), a, d, T::one(), x);
                backend.potrs(&self.factor, x);
                backend.gemv(false, T::one(), a, x, T::zero(), y);
            }
            GramShape::AAt => {
                // s = c + Aᵀd;  x = s − Aᵀ(I + AAᵀ)⁻¹ A s
                let s = &mut self.tmp_n;
                let t = &mut self.tmp_m;
                s.copy_from_slice(c);
                backend.gemv(true, T::one(), a, d, T::one(), &mut s[..]);
                backend.gemv(false, T::one(), a, &s[..], T::zero(), &mut t[..]);
                backend.potrs(&self.factor, &mut t[..]);
                x.copy_from_slice(&s[..]);
                backend.gemv(true, -T::one(), a, &t[..], T::one(), x);
                backend.gemv(false, T::one(), a, x, T::zero(), y);
            }
        }
    }
}
