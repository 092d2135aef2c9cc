//! mead-util - Core utilities and foundation types.
//!
//! This crate provides the infrastructure the rest of the compiler is built
//! on: source locations, typed index vectors for arena-style storage, and
//! the diagnostic types the driver reports through.

mod diagnostic;
mod index_vec;
mod location;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use index_vec::{Idx, IndexVec};
pub use location::SourceLocation;

// Re-export commonly used hash collections
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
