//! Graphform: a graph-form ADMM solver.
//!
//! This library solves convex optimization problems in **graph form**:
//!
//! ```text
//! minimize    f(y) + g(x)
//! subject to  y = A x
//! ```
//!
//! where `A` is a dense m × n matrix and `f`, `g` are separable across
//! coordinates, each coordinate penalized by a scalar convex function from
//! a fixed catalog ([`FunctionKind`]). This shape covers least squares
//! with constraints, LPs, lasso, SVMs, and logistic regression, among
//! others.
//!
//! # Algorithm
//!
//! The solver is the **Alternating Direction Method of Multipliers**
//! specialized to the graph-form splitting of Parikh & Boyd. Key
//! properties:
//!
//! - **Closed-form prox library**: every catalog function has a cheap
//!   scalar prox, applied coordinate-wise and in parallel.
//! - **Cached factorization**: the projection onto `{(x, y) : y = A x}`
//!   reuses one Cholesky factor of `I + AᵀA` (or `I + AAᵀ` when `m < n`,
//!   via the matrix-inversion lemma) across all iterations.
//! - **Standard residual-based stopping** with absolute and relative
//!   tolerances.
//!
//! # Example
//!
//! ```
//! use graphform_core::{solve, FunctionKind, FunctionObj, MatrixRef, ProblemData, SolverSettings};
//!
//! // Non-negative least squares: min ½‖Ax − b‖² s.t. x ≥ 0
//! let a = vec![
//!     1.0, 2.0,
//!     3.0, 4.0,
//!     5.0, 6.0,
//! ];
//! let b = [1.0, 2.0, 3.0];
//!
//! let prob = ProblemData {
//!     a: MatrixRef::new(&a, 3, 2),
//!     f: b.iter()
//!         .map(|&bi| FunctionObj::new(FunctionKind::Square).with_b(bi))
//!         .collect(),
//!     g: vec![FunctionObj::new(FunctionKind::IndGe0); 2],
//! };
//!
//! let settings = SolverSettings { verbose: false, ..Default::default() };
//! let result = solve(&prob, &settings).unwrap();
//! println!("status: {}, x = {:?}", result.status, result.x);
//! ```
//!
//! # References
//!
//! - N. Parikh and S. Boyd, *Proximal Algorithms*, Foundations and Trends
//!   in Optimization, 2014 (§ graph projection splitting).
//! - S. Boyd et al., *Distributed Optimization and Statistical Learning
//!   via the Alternating Direction Method of Multipliers*, 2011.

#![warn(clippy::all)]

pub mod admm;
pub mod linalg;
pub mod problem;
pub mod prox;
pub mod scalar;
pub mod util;

// Re-export main types
pub use linalg::backend::{FactorizationError, GramShape, LinearBackend};
pub use linalg::backends::ReferenceBackend;
pub use linalg::dense::{DenseMatrix, MatrixRef};
pub use problem::{
    FunctionKind, FunctionObj, ProblemData, SolveInfo, SolveResult, SolveStatus, SolverError,
    SolverSettings,
};
pub use scalar::Scalar;

/// Solve a graph-form problem with the built-in dense CPU backend.
///
/// Validates the input, builds the one-time factorization, runs the ADMM
/// iteration, and returns the solution with diagnostics. See
/// [`admm::solve_admm`] to supply a different backend.
pub fn solve<T: Scalar>(
    prob: &ProblemData<'_, T>,
    settings: &SolverSettings<T>,
) -> Result<SolveResult<T>, SolverError> {
    admm::solve_admm(prob, settings, &ReferenceBackend)
}
