//! Backend operation contract.
//!
//! The engine is written once against this trait; a backend supplies the
//! handful of dense operations the graph-form iteration needs. The
//! operation names follow the BLAS/LAPACK routines they correspond to, so
//! a backend wrapping an accelerated library is a thin shim.

use thiserror::Error;

use super::dense::{DenseMatrix, MatrixRef};
use crate::scalar::Scalar;

/// Factorization errors.
#[derive(Debug, Error)]
pub enum FactorizationError {
    /// The Gram matrix stopped being positive definite under rounding.
    #[error("Cholesky factorization failed: leading minor ending at column {column} is not positive definite")]
    NotPositiveDefinite {
        /// Column at which the pivot became nonpositive.
        column: usize,
    },
}

/// Which Gram matrix to form from `A`.
///
/// The projection step solves a system in whichever of the two is smaller;
/// the choice is fixed once per solve by comparing `m` and `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GramShape {
    /// `G = I + AᵀA`, n × n. Preferred when `m ≥ n`.
    AtA,
    /// `G = I + AAᵀ`, m × m. Preferred when `m < n`.
    AAt,
}

/// Dense linear-algebra backend.
///
/// All slice arguments must have the lengths implied by the matrix
/// dimensions; implementations may `debug_assert` them. The backend may
/// parallelize internally, but every operation is complete when it
/// returns.
pub trait LinearBackend<T: Scalar> {
    /// Opaque factorization handle produced by [`potrf`](Self::potrf).
    type Factor;

    /// Matrix-vector product `y ← α·op(A)·x + β·y`, where `op(A)` is `A`
    /// (`trans == false`, `y` of length m) or `Aᵀ` (`trans == true`, `y`
    /// of length n). `β = 0` overwrites `y` without reading it.
    fn gemv(&self, trans: bool, alpha: T, a: &MatrixRef<'_, T>, x: &[T], beta: T, y: &mut [T]);

    /// `y ← α·x + y`.
    fn axpy(&self, alpha: T, x: &[T], y: &mut [T]);

    /// Euclidean norm of `x`.
    fn nrm2(&self, x: &[T]) -> T;

    /// Form the Gram matrix `I + AᵀA` or `I + AAᵀ` by a symmetric
    /// rank-k accumulation, identity added on the diagonal.
    fn syrk(&self, a: &MatrixRef<'_, T>, shape: GramShape) -> DenseMatrix<T>;

    /// Cholesky-factor a symmetric positive-definite matrix in place,
    /// consuming it and returning the factor handle.
    fn potrf(&self, g: DenseMatrix<T>) -> Result<Self::Factor, FactorizationError>;

    /// Solve `L·Lᵀ·z = rhs` in place by two triangular solves.
    fn potrs(&self, factor: &Self::Factor, rhs: &mut [T]);
}
