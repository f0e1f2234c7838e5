//! Problem data structures and validation.
//!
//! This module defines the graph-form problem representation
//!
//! ```text
//! minimize    f(y) + g(x)
//! subject to  y = A x
//! ```
//!
//! together with the solver settings, statuses, and result types. `f` and
//! `g` are separable: one scalar [`FunctionObj`] per coordinate of `y`
//! (row of `A`) and per coordinate of `x` (column of `A`).

use std::fmt;

use thiserror::Error;

use crate::linalg::backend::FactorizationError;
use crate::linalg::dense::MatrixRef;
use crate::scalar::Scalar;
use crate::util::numerics::cast;

/// The closed catalog of scalar convex functions `h`.
///
/// Each variant is a one-dimensional convex function; an affine
/// pre-composition and quadratic post-addition are layered on top by
/// [`FunctionObj`]. Indicator variants (`Ind*`) take value 0 on their
/// domain and +∞ elsewhere; their prox is a Euclidean projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// `h(x) = |x|`
    Abs,
    /// Huber loss: `x²/2` for `|x| ≤ 1`, `|x| − 1/2` otherwise.
    Huber,
    /// `h(x) = x`
    Identity,
    /// Indicator of the interval `[0, 1]`.
    IndBox01,
    /// Indicator of `{0}` (equality constraint).
    IndEq0,
    /// Indicator of `[0, ∞)`.
    IndGe0,
    /// Indicator of `(−∞, 0]`.
    IndLe0,
    /// `h(x) = −log x` on `x > 0`.
    NegLog,
    /// Logistic loss `h(x) = log(1 + eˣ)`.
    LogExp,
    /// Hinge on the negative part: `h(x) = max(0, −x)`.
    MaxNeg0,
    /// Hinge on the positive part: `h(x) = max(0, x)`.
    MaxPos0,
    /// `h(x) = x²/2`
    Square,
    /// `h(x) = 0`
    Zero,
}

impl FunctionKind {
    /// Whether this kind is a set indicator (prox = projection).
    pub fn is_indicator(self) -> bool {
        matches!(
            self,
            FunctionKind::IndBox01
                | FunctionKind::IndEq0
                | FunctionKind::IndGe0
                | FunctionKind::IndLe0
        )
    }
}

/// One scalar convex function with affine pre-composition and quadratic
/// post-addition:
///
/// ```text
/// φ(x) = c·h(a·x − b) + d·x + (e/2)·x²
/// ```
///
/// Invariants: `a ≠ 0`, `c ≥ 0`, `e ≥ 0`. Indicator kinds additionally
/// require `c = 1, d = 0, e = 0` (pure set membership). Defaults are
/// `a = 1, b = 0, c = 1, d = 0, e = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionObj<T> {
    /// Which base function `h` this object wraps.
    pub h: FunctionKind,
    /// Scale inside the composition, `h(a·x − b)`. Must be nonzero.
    pub a: T,
    /// Shift inside the composition.
    pub b: T,
    /// Nonnegative weight on `h`.
    pub c: T,
    /// Linear term coefficient.
    pub d: T,
    /// Nonnegative quadratic term coefficient (`(e/2)·x²`).
    pub e: T,
}

impl<T: Scalar> FunctionObj<T> {
    /// A `FunctionObj` wrapping `h` with the default parameters
    /// `a = 1, b = 0, c = 1, d = 0, e = 0`.
    pub fn new(h: FunctionKind) -> Self {
        Self {
            h,
            a: T::one(),
            b: T::zero(),
            c: T::one(),
            d: T::zero(),
            e: T::zero(),
        }
    }

    /// Set the inner scale `a`.
    pub fn with_a(mut self, a: T) -> Self {
        self.a = a;
        self
    }

    /// Set the inner shift `b`.
    pub fn with_b(mut self, b: T) -> Self {
        self.b = b;
        self
    }

    /// Set the weight `c`.
    pub fn with_c(mut self, c: T) -> Self {
        self.c = c;
        self
    }

    /// Set the linear coefficient `d`.
    pub fn with_d(mut self, d: T) -> Self {
        self.d = d;
        self
    }

    /// Set the quadratic coefficient `e`.
    pub fn with_e(mut self, e: T) -> Self {
        self.e = e;
        self
    }

    /// Validate the parameter invariants for this object.
    pub fn validate(&self) -> Result<(), String> {
        if self.a == T::zero() {
            return Err("function parameter a must be nonzero".to_string());
        }
        if self.c < T::zero() {
            return Err(format!(
                "function parameter c must be nonnegative, got {}",
                self.c
            ));
        }
        if self.e < T::zero() {
            return Err(format!(
                "function parameter e must be nonnegative, got {}",
                self.e
            ));
        }
        if self.h.is_indicator()
            && (self.c != T::one() || self.d != T::zero() || self.e != T::zero())
        {
            return Err(format!(
                "indicator {:?} requires c = 1, d = 0, e = 0",
                self.h
            ));
        }
        Ok(())
    }
}

/// Graph-form problem in canonical form.
///
/// The matrix `A` is caller-owned, dense, row-major. The solver only reads
/// it; the solution is returned as owned vectors in [`SolveResult`].
///
/// # Dimensions
///
/// - `A`: m × n
/// - `f`: m entries, one per coordinate of `y`
/// - `g`: n entries, one per coordinate of `x`
#[derive(Debug, Clone)]
pub struct ProblemData<'a, T> {
    /// Dense constraint matrix `A` (m × n, row-major, caller-owned).
    pub a: MatrixRef<'a, T>,

    /// Separable objective terms on `y = A x` (length m).
    pub f: Vec<FunctionObj<T>>,

    /// Separable objective terms on `x` (length n).
    pub g: Vec<FunctionObj<T>>,
}

impl<'a, T: Scalar> ProblemData<'a, T> {
    /// Number of rows of `A` (length of `y`).
    pub fn num_rows(&self) -> usize {
        self.a.rows()
    }

    /// Number of columns of `A` (length of `x`).
    pub fn num_cols(&self) -> usize {
        self.a.cols()
    }

    /// Validate dimensions and function parameters.
    ///
    /// All invalid-input conditions are detected here, before the solver
    /// allocates anything.
    pub fn validate(&self) -> Result<(), SolverError> {
        let m = self.num_rows();
        let n = self.num_cols();

        if m == 0 || n == 0 {
            return Err(SolverError::InvalidInput(format!(
                "matrix dimensions must be positive, got {}x{}",
                m, n
            )));
        }
        if self.f.len() != m {
            return Err(SolverError::InvalidInput(format!(
                "f has {} entries, expected one per row: {}",
                self.f.len(),
                m
            )));
        }
        if self.g.len() != n {
            return Err(SolverError::InvalidInput(format!(
                "g has {} entries, expected one per column: {}",
                self.g.len(),
                n
            )));
        }

        for (i, obj) in self.f.iter().enumerate() {
            obj.validate()
                .map_err(|e| SolverError::InvalidInput(format!("f[{}]: {}", i, e)))?;
        }
        for (i, obj) in self.g.iter().enumerate() {
            obj.validate()
                .map_err(|e| SolverError::InvalidInput(format!("g[{}]: {}", i, e)))?;
        }

        Ok(())
    }
}

/// Solver settings and parameters.
#[derive(Debug, Clone)]
pub struct SolverSettings<T> {
    /// ADMM penalty parameter ρ. Fixed for the whole solve; must be positive.
    pub rho: T,

    /// Maximum number of ADMM iterations.
    pub max_iter: usize,

    /// Relative tolerance in the stopping criterion.
    pub rel_tol: T,

    /// Absolute tolerance in the stopping criterion.
    pub abs_tol: T,

    /// Print per-iteration diagnostics.
    pub verbose: bool,
}

impl<T: Scalar> Default for SolverSettings<T> {
    fn default() -> Self {
        // Allow environment variable override for the iteration cap, useful
        // when re-running a benchmark without recompiling the driver.
        let max_iter = std::env::var("GRAPHFORM_MAX_ITER")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1000);

        Self {
            rho: T::one(),
            max_iter,
            rel_tol: cast(1e-3),
            abs_tol: cast(1e-4),
            verbose: true,
        }
    }
}

impl<T: Scalar> SolverSettings<T> {
    /// Validate parameter invariants.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.rho > T::zero()) || !self.rho.is_finite() {
            return Err(SolverError::InvalidInput(format!(
                "rho must be positive and finite, got {}",
                self.rho
            )));
        }
        if self.rel_tol < T::zero() || self.abs_tol < T::zero() {
            return Err(SolverError::InvalidInput(
                "tolerances must be nonnegative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Solution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Both primal and dual residuals within tolerance.
    Solved,

    /// Iteration cap reached; the last iterate is still returned.
    MaxIterReached,

    /// Non-finite iterates encountered; the last iterate is still returned.
    NumericalError,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Solved => write!(f, "Solved"),
            SolveStatus::MaxIterReached => write!(f, "Max Iterations Reached"),
            SolveStatus::NumericalError => write!(f, "Numerical Error"),
        }
    }
}

/// Errors reported before or instead of iterating.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Dimension mismatch or violated parameter invariant.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The one-time Cholesky factorization failed, which indicates `A` is
    /// ill-conditioned enough that `I + AᵀA` was perturbed to
    /// indefiniteness by rounding.
    #[error(transparent)]
    Factorization(#[from] FactorizationError),
}

/// Solve result with solution and diagnostics.
#[derive(Debug, Clone)]
pub struct SolveResult<T> {
    /// Termination status.
    pub status: SolveStatus,

    /// Primal solution `x` (length n).
    pub x: Vec<T>,

    /// `y = A x` at the solution (length m).
    pub y: Vec<T>,

    /// Objective `f(ỹ) + g(x̃)` at the final prox iterates.
    pub obj_val: T,

    /// Detailed solve information.
    pub info: SolveInfo<T>,
}

/// Detailed solve information and diagnostics.
#[derive(Debug, Clone)]
pub struct SolveInfo<T> {
    /// Number of ADMM iterations completed.
    pub iters: usize,

    /// Total solve time (milliseconds).
    pub solve_time_ms: u64,

    /// Time spent building and factoring the Gram matrix (milliseconds).
    pub factor_time_ms: u64,

    /// Final primal residual `‖x − x̃‖ + ‖y − ỹ‖`.
    pub primal_res: T,

    /// Final dual residual `ρ·(‖x − x_prev‖ + ‖y − y_prev‖)`.
    pub dual_res: T,

    /// Final primal tolerance.
    pub eps_primal: T,

    /// Final dual tolerance.
    pub eps_dual: T,
}
