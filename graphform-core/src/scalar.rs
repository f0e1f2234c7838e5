//! Scalar abstraction for single- and double-precision solves.
//!
//! The whole solver is generic over one floating-point type, fixed per
//! instantiation. `Scalar` collects the bounds the engine needs: `Float`
//! arithmetic, in-place assignment operators, summation, thread-safety for
//! the parallel prox step, and the formatting traits used by the verbose
//! iteration table.

use std::fmt::{Debug, Display, LowerExp};
use std::iter::Sum;

use num_traits::{Float, NumAssign};

/// Floating-point scalar usable by the solver (`f32` or `f64`).
pub trait Scalar:
    Float + NumAssign + Sum + Send + Sync + Debug + Display + LowerExp + 'static
{
}

impl<T> Scalar for T where
    T: Float + NumAssign + Sum + Send + Sync + Debug + Display + LowerExp + 'static
{
}
