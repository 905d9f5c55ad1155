//! Hierarchical scope enrichment.
//!
//! # Data Flow
//! ```text
//! begin_scope(cx, state)
//!     → new ScopeFrame { state, parent: cx.current }
//!     → cx.current = new frame
//!     → ScopeGuard (drop → cx.current = parent)
//!
//! Logger::write(cx, ..)
//!     → ScopeProvider::flatten(cx) (outermost first)
//!     → LogEntry.scopes
//! ```
//!
//! # Design Decisions
//! - Context is passed explicitly, never read from thread-locals
//! - Frames are immutable and shared through `Arc`
//! - Each context swaps its own current pointer atomically

mod context;
mod frame;
mod provider;

pub use context::{ScopeContext, ScopeGuard};
pub use frame::{Ancestors, ScopeFrame};
pub use provider::{ChainScopeProvider, NullScopeProvider, ScopeProvider};
