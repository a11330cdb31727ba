use serde::Serialize;

use crate::core::node::VersionedNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FocusKind {
    Hover,
    Selection,
}

/// Hover and click state of the version markers.
///
/// A click pins the clicked node as the focus until it is clicked again;
/// hover events are ignored while something is pinned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    hovered: Option<VersionedNode>,
    selected: Option<VersionedNode>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover_enter(&mut self, node: VersionedNode) {
        if self.selected.is_none() {
            self.hovered = Some(node);
        }
    }

    pub fn hover_leave(&mut self) {
        if self.selected.is_none() {
            self.hovered = None;
        }
    }

    pub fn click(&mut self, node: VersionedNode) {
        if self.selected.as_ref() == Some(&node) {
            self.selected = None;
        } else {
            self.selected = Some(node);
            self.hovered = None;
        }
    }

    pub fn selected(&self) -> Option<&VersionedNode> {
        self.selected.as_ref()
    }

    pub fn focal(&self) -> Option<&VersionedNode> {
        self.selected.as_ref().or(self.hovered.as_ref())
    }

    pub fn focus_kind(&self) -> Option<FocusKind> {
        if self.selected.is_some() {
            Some(FocusKind::Selection)
        } else if self.hovered.is_some() {
            Some(FocusKind::Hover)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::node::VersionedNode;
    use crate::render::interaction::{FocusKind, InteractionState};

    #[test]
    fn hover_sets_and_clears_focus() {
        let mut state = InteractionState::new();
        state.hover_enter(VersionedNode::from_key("a/x@1"));
        state.hover_enter(VersionedNode::from_key("a/x@2"));
        assert_eq!(state.focal().map(|n| n.as_str()), Some("a/x@2"));
        assert_eq!(state.focus_kind(), Some(FocusKind::Hover));
        state.hover_leave();
        assert!(state.focal().is_none());
        assert!(state.focus_kind().is_none());
    }

    #[test]
    fn selection_pins_focus_until_clicked_again() {
        let mut state = InteractionState::new();
        state.click(VersionedNode::from_key("a/x@1"));
        state.hover_enter(VersionedNode::from_key("a/y@1"));
        state.hover_leave();
        assert_eq!(state.focal().map(|n| n.as_str()), Some("a/x@1"));
        assert_eq!(state.focus_kind(), Some(FocusKind::Selection));

        state.click(VersionedNode::from_key("a/z@1"));
        assert_eq!(state.selected().map(|n| n.as_str()), Some("a/z@1"));

        state.click(VersionedNode::from_key("a/z@1"));
        assert!(state.focal().is_none());
    }
}
