//! Per-page frame navigation context.
//!
//! Each `WebPage` handle carries an explicit frame-context state machine
//! rather than relying on whatever frame the engine last had selected:
//! every frame-scoped call re-establishes the context from this state, so
//! separate handles and separate processes never interfere, and tests can
//! assert the current state directly.

use phantomjs_protocol::FrameSelector;

/// The currently selected frame within a page's frameset.
///
/// The default context is the top-level document; it is restored on page
/// creation and after every successful `open`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FrameContext {
    /// The top-level document.
    #[default]
    MainFrame,
    /// A named frame among the current frameset's direct children.
    Name(String),
    /// A frame addressed by zero-based position within the frameset.
    Index(u32),
}

impl FrameContext {
    /// The wire selector for this context; `None` for the top-level
    /// document, which needs no re-establishment beyond the reset the
    /// engine performs on every call.
    pub(crate) fn selector(&self) -> Option<FrameSelector> {
        match self {
            FrameContext::MainFrame => None,
            FrameContext::Name(name) => Some(FrameSelector::Name(name.clone())),
            FrameContext::Index(index) => Some(FrameSelector::Index(*index)),
        }
    }

    /// True when the top-level document is selected.
    pub fn is_main(&self) -> bool {
        matches!(self, FrameContext::MainFrame)
    }
}
