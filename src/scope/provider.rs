//! Scope provider capability and the two built-in implementations.

use std::fmt;
use std::sync::Arc;

use crate::entry::Fields;
use crate::scope::{ScopeContext, ScopeFrame, ScopeGuard};

/// Pluggable strategy for pushing scopes and reading them back.
///
/// A host can supply its own implementation to bridge scopes into another
/// context mechanism; otherwise [`ChainScopeProvider`] is used.
pub trait ScopeProvider: Send + Sync + fmt::Debug {
    /// Push `state` as the new innermost scope of `cx`.
    fn begin_scope<'a>(&self, cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a>;

    /// The innermost frame of `cx`, if any.
    fn current(&self, cx: &ScopeContext) -> Option<Arc<ScopeFrame>>;

    /// Visit each active scope's state, outermost first.
    fn for_each_scope(&self, cx: &ScopeContext, visitor: &mut dyn FnMut(&Fields)) {
        if let Some(frame) = self.current(cx) {
            let mut frames: Vec<&ScopeFrame> = frame.ancestors().collect();
            frames.reverse();
            for f in frames {
                visitor(f.state());
            }
        }
    }

    /// Every active scope merged into one sequence, outermost first.
    fn flatten(&self, cx: &ScopeContext) -> Fields {
        self.current(cx).map(|f| f.flatten()).unwrap_or_default()
    }
}

/// Default provider: a linked chain of immutable frames per context.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChainScopeProvider;

impl ChainScopeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ScopeProvider for ChainScopeProvider {
    fn begin_scope<'a>(&self, cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a> {
        let frame = ScopeFrame::new(state, cx.current());
        cx.replace(Some(Arc::clone(&frame)));
        ScopeGuard::new(cx, frame)
    }

    fn current(&self, cx: &ScopeContext) -> Option<Arc<ScopeFrame>> {
        cx.current()
    }
}

/// Provider that drops every scope. Entries carry no scope context.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScopeProvider;

impl ScopeProvider for NullScopeProvider {
    fn begin_scope<'a>(&self, _cx: &'a ScopeContext, _state: Fields) -> ScopeGuard<'a> {
        ScopeGuard::inert()
    }

    fn current(&self, _cx: &ScopeContext) -> Option<Arc<ScopeFrame>> {
        None
    }
}
