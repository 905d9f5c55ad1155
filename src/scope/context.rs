//! Per-execution-context scope state and the guard that restores it.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::scope::ScopeFrame;

/// The "current frame" pointer for one logical execution context.
///
/// Create one per request or task and pass it explicitly to
/// [`Logger::write`](crate::Logger::write) and `begin_scope`. Contexts never
/// observe each other's frames.
#[derive(Debug, Default)]
pub struct ScopeContext {
    current: ArcSwapOption<ScopeFrame>,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new context whose current frame is this context's current
    /// frame. Scopes begun in the fork are not visible here.
    pub fn fork(&self) -> Self {
        Self {
            current: ArcSwapOption::new(self.current()),
        }
    }

    pub fn current(&self) -> Option<Arc<ScopeFrame>> {
        self.current.load_full()
    }

    /// Replace the current frame, returning the previous one.
    pub fn replace(&self, frame: Option<Arc<ScopeFrame>>) -> Option<Arc<ScopeFrame>> {
        self.current.swap(frame)
    }

    pub fn depth(&self) -> usize {
        let current = self.current.load();
        current.as_deref().map_or(0, ScopeFrame::depth)
    }

    /// End `frame`. If it is the current frame, the pointer moves to the
    /// nearest ancestor still open; otherwise the context is left as is.
    fn pop(&self, frame: &Arc<ScopeFrame>) {
        frame.end();
        let current = self.current.load();
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, frame)) {
            self.current.compare_and_swap(&current, frame.open_ancestor());
        }
    }
}

/// Token returned by `begin_scope`; dropping it ends the scope.
///
/// Guards are meant to be released innermost first. Ending a scope moves the
/// context's current pointer back to the nearest frame whose scope is still
/// open. A guard released out of order only marks its frame as ended: the
/// pointer stays on the inner frame, and when that one ends the ended frame
/// is skipped. Frames themselves stay readable for anyone still holding them.
#[must_use = "the scope ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeGuard<'a> {
    restore: Option<(&'a ScopeContext, Arc<ScopeFrame>)>,
}

impl<'a> ScopeGuard<'a> {
    /// A guard for `frame`, which the caller has just made current in `cx`.
    pub fn new(cx: &'a ScopeContext, frame: Arc<ScopeFrame>) -> Self {
        Self {
            restore: Some((cx, frame)),
        }
    }

    /// A guard that does nothing when released.
    pub fn inert() -> Self {
        Self { restore: None }
    }

    /// End the scope now.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some((cx, frame)) = self.restore.take() {
            cx.pop(&frame);
        }
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Fields;

    #[test]
    fn test_guard_restores_previous_frame() {
        let cx = ScopeContext::new();
        let frame = ScopeFrame::new(Fields::new().with("a", 1), None);
        let previous = cx.replace(Some(frame.clone()));
        assert!(previous.is_none());

        let guard = ScopeGuard::new(&cx, frame.clone());
        assert_eq!(cx.depth(), 1);
        drop(guard);
        assert_eq!(cx.depth(), 0);
        // The frame object itself is still valid.
        assert_eq!(frame.state().len(), 1);
        assert!(!frame.is_open());
    }

    #[test]
    fn test_explicit_close_is_single_release() {
        let cx = ScopeContext::new();
        let outer = ScopeFrame::new(Fields::new(), None);
        cx.replace(Some(outer.clone()));

        let inner = ScopeFrame::new(Fields::new(), Some(outer.clone()));
        cx.replace(Some(inner.clone()));
        let guard = ScopeGuard::new(&cx, inner);
        guard.close();
        assert_eq!(cx.depth(), 1);
    }

    fn push<'a>(cx: &'a ScopeContext, state: Fields) -> ScopeGuard<'a> {
        let frame = ScopeFrame::new(state, cx.current());
        cx.replace(Some(frame.clone()));
        ScopeGuard::new(cx, frame)
    }

    #[test]
    fn test_out_of_order_release_never_revives_ended_scope() {
        let cx = ScopeContext::new();
        let outer = push(&cx, Fields::new().with("a", 1));
        let inner = push(&cx, Fields::new().with("b", 2));

        // Outer first: the inner scope is still open and stays current.
        drop(outer);
        assert_eq!(cx.depth(), 2);

        // Inner next: the ended outer frame is skipped, not restored.
        drop(inner);
        assert!(cx.current().is_none());
    }

    #[test]
    fn test_out_of_order_release_falls_back_to_open_scope() {
        let cx = ScopeContext::new();
        let root = push(&cx, Fields::new().with("tenant", "acme"));
        let middle = push(&cx, Fields::new().with("request_id", "42"));
        let leaf = push(&cx, Fields::new().with("step", "db"));

        drop(middle);
        drop(leaf);
        let current = cx.current().unwrap();
        assert_eq!(current.depth(), 1);
        assert!(current.state().get("tenant").is_some());

        drop(root);
        assert_eq!(cx.depth(), 0);
    }

    #[test]
    fn test_fork_is_isolated() {
        let cx = ScopeContext::new();
        cx.replace(Some(ScopeFrame::new(Fields::new().with("tenant", "t1"), None)));

        let child = cx.fork();
        let parent_frame = child.current();
        child.replace(Some(ScopeFrame::new(Fields::new().with("job", 9), parent_frame)));

        assert_eq!(child.depth(), 2);
        assert_eq!(cx.depth(), 1);
    }

    #[test]
    fn test_inert_guard_leaves_context_alone() {
        let cx = ScopeContext::new();
        cx.replace(Some(ScopeFrame::new(Fields::new(), None)));
        drop(ScopeGuard::inert());
        assert_eq!(cx.depth(), 1);
    }
}
