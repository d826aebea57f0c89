//! Memoization decorators.
//!
//! - [`FifoStore`]: the bounded, insertion-ordered store backing the cache
//! - [`Sticky`]: memoizes results per input; not coordinated across callers
//! - [`Solid`]: `Synchronized(Sticky(..))`, memoization with at-most-once
//!   computation per key under concurrency
//!
//! Eviction is strictly FIFO by insertion order. Reads never refresh a key.
//!
//! # Example
//!
//! ```rust
//! use sturdy::{from_sync, Computation, ComputationExt, Error};
//!
//! # tokio_test::block_on(async {
//! let cached = from_sync(|c: char| Ok::<_, Error>(c.to_ascii_uppercase())).sticky_bounded(2);
//!
//! for c in ['a', 'b', 'c'] {
//!     cached.invoke(c).await.unwrap();
//! }
//! assert_eq!(cached.keys(), vec!['b', 'c']);
//! # });
//! ```

mod solid;
mod sticky;
mod store;

pub use solid::Solid;
pub use sticky::Sticky;
pub use store::FifoStore;
