//! The computation contract, closure adapters, and decorator builders.
//!
//! Everything in this crate is a [`Computation`]: the adapters here turn
//! plain functions into one, and every decorator both wraps and exposes the
//! same contract, so any decorator can wrap any other.

mod boxed;
mod ext;
mod from_fn;
mod trait_def;

pub use boxed::BoxComputation;
pub use ext::ComputationExt;
pub use from_fn::{from_fn, from_sync, Discard, FromFn, FromSync};
pub use trait_def::Computation;
