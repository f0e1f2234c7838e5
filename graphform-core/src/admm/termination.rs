//! Convergence test for the ADMM iteration.
//!
//! Standard scaled-form primal/dual residuals:
//!
//! ```text
//! r_pri  = ‖x − x̃‖ + ‖y − ỹ‖
//! r_dual = ρ·(‖x − x_prev‖ + ‖y − y_prev‖)
//! ε_pri  = √(m+n)·abs_tol + rel_tol·max(‖(x, y)‖, ‖(x̃, ỹ)‖)
//! ε_dual = √(m+n)·abs_tol + rel_tol·ρ·‖(x̄, ȳ)‖
//! ```
//!
//! The solver stops when both residuals fall under their tolerances, when
//! the iteration cap is reached, or when the iterates stop being finite.

use super::workspace::AdmmWorkspace;
use crate::linalg::backend::LinearBackend;
use crate::problem::SolveStatus;
use crate::scalar::Scalar;
use crate::util::numerics::cast;

/// Residuals and tolerances for one iteration.
#[derive(Debug, Clone, Copy)]
pub struct Residuals<T> {
    /// Primal residual `‖x − x̃‖ + ‖y − ỹ‖`.
    pub primal: T,
    /// Dual residual `ρ·(‖x − x_prev‖ + ‖y − y_prev‖)`.
    pub dual: T,
    /// Primal tolerance.
    pub eps_primal: T,
    /// Dual tolerance.
    pub eps_dual: T,
}

/// Compute residuals and tolerances for the current iterates.
pub fn compute_residuals<T: Scalar, B: LinearBackend<T>>(
    backend: &B,
    ws: &mut AdmmWorkspace<T>,
    rho: T,
    rel_tol: T,
    abs_tol: T,
) -> Residuals<T> {
    let m = ws.y.len();
    let n = ws.x.len();

    ws.scratch_n.copy_from_slice(&ws.x);
    backend.axpy(-T::one(), &ws.x_tilde, &mut ws.scratch_n);
    ws.scratch_m.copy_from_slice(&ws.y);
    backend.axpy(-T::one(), &ws.y_tilde, &mut ws.scratch_m);
    let primal = backend.nrm2(&ws.scratch_n) + backend.nrm2(&ws.scratch_m);

    ws.scratch_n.copy_from_slice(&ws.x);
    backend.axpy(-T::one(), &ws.x_prev, &mut ws.scratch_n);
    ws.scratch_m.copy_from_slice(&ws.y);
    backend.axpy(-T::one(), &ws.y_prev, &mut ws.scratch_m);
    let dual = rho * (backend.nrm2(&ws.scratch_n) + backend.nrm2(&ws.scratch_m));

    let norm_iter = backend.nrm2(&ws.x).hypot(backend.nrm2(&ws.y));
    let norm_tilde = backend.nrm2(&ws.x_tilde).hypot(backend.nrm2(&ws.y_tilde));
    let norm_dual = backend.nrm2(&ws.x_dual).hypot(backend.nrm2(&ws.y_dual));

    let sqrt_dim = cast::<T>(((m + n) as f64).sqrt());
    let eps_primal = sqrt_dim * abs_tol + rel_tol * norm_iter.max(norm_tilde);
    let eps_dual = sqrt_dim * abs_tol + rel_tol * rho * norm_dual;

    Residuals {
        primal,
        dual,
        eps_primal,
        eps_dual,
    }
}

/// Check termination conditions.
///
/// Returns `Some(status)` if the solver should stop after iteration
/// `iter` (zero-based), `None` otherwise.
pub fn check_termination<T: Scalar>(
    res: &Residuals<T>,
    iter: usize,
    max_iter: usize,
) -> Option<SolveStatus> {
    // Norms absorb every iterate, so a single non-finite check covers the
    // whole state.
    if !res.primal.is_finite()
        || !res.dual.is_finite()
        || !res.eps_primal.is_finite()
        || !res.eps_dual.is_finite()
    {
        return Some(SolveStatus::NumericalError);
    }

    if res.primal <= res.eps_primal && res.dual <= res.eps_dual {
        return Some(SolveStatus::Solved);
    }

    if iter + 1 >= max_iter {
        return Some(SolveStatus::MaxIterReached);
    }

    None
}
