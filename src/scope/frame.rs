//! Immutable scope frames.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::entry::Fields;

/// One level of scope enrichment.
///
/// Frames form a singly-linked chain through `parent`. A frame is never
/// mutated after construction; pushing a scope allocates a new frame that
/// points at the previous one, so any number of contexts can share a chain.
///
/// The only mutable bit is whether the scope that pushed the frame is still
/// open; it is cleared once, when the scope's guard is released.
#[derive(Debug)]
pub struct ScopeFrame {
    state: Fields,
    parent: Option<Arc<ScopeFrame>>,
    depth: usize,
    open: AtomicBool,
}

impl ScopeFrame {
    pub fn new(state: Fields, parent: Option<Arc<ScopeFrame>>) -> Arc<Self> {
        let depth = parent.as_ref().map_or(1, |p| p.depth + 1);
        Arc::new(Self {
            state,
            parent,
            depth,
            open: AtomicBool::new(true),
        })
    }

    pub fn state(&self) -> &Fields {
        &self.state
    }

    pub fn parent(&self) -> Option<&Arc<ScopeFrame>> {
        self.parent.as_ref()
    }

    /// False once the guard that pushed this frame has been released.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub(crate) fn end(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Nearest ancestor (excluding this frame) whose scope is still open.
    pub(crate) fn open_ancestor(&self) -> Option<Arc<ScopeFrame>> {
        let mut next = self.parent.as_ref();
        while let Some(frame) = next {
            if frame.is_open() {
                return Some(Arc::clone(frame));
            }
            next = frame.parent.as_ref();
        }
        None
    }

    /// Number of frames in the chain ending at this one.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Walk the chain from this frame (innermost) to the root (outermost).
    ///
    /// The walk is lazy and can be restarted any number of times.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Merge every frame's state into one sequence, outermost first.
    pub fn flatten(&self) -> Fields {
        let mut frames: Vec<&ScopeFrame> = self.ancestors().collect();
        frames.reverse();
        let mut out = Fields::new();
        for frame in frames {
            out.extend_from(&frame.state);
        }
        out
    }
}

/// Iterator returned by [`ScopeFrame::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a ScopeFrame>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ScopeFrame;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
