//! Backend implementations of the [`LinearBackend`] contract.
//!
//! [`LinearBackend`]: crate::linalg::backend::LinearBackend

pub mod reference;

pub use self::reference::ReferenceBackend;
