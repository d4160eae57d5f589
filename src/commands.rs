//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::model::{PageId, PanelHandle, Rect};

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Run a layout pass
    Relayout {
        /// Client area to lay out; the host's current one when `None`
        client: Option<Rect>,
        trigger: Option<PageId>,
        full_redraw: bool,
    },
    /// Run the tab-activation entry point for a page
    TabActivated(PageId),
    /// Re-derive geometry and repaint both views
    FullRedraw,
    /// Tear down surfaces that left the registry
    DestroyPanels(Vec<PanelHandle>),
    /// Kick off the one-shot update check
    StartUpdateCheck,
    /// Persist the session
    Autosave,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Relayout scoped to one page
    pub fn relayout_for(page: PageId) -> Self {
        Cmd::Relayout {
            client: None,
            trigger: Some(page),
            full_redraw: false,
        }
    }

    /// Relayout with no triggering page
    pub fn relayout() -> Self {
        Cmd::Relayout {
            client: None,
            trigger: None,
            full_redraw: false,
        }
    }

    /// Flatten nested batches into execution order, dropping `None`
    pub fn flatten(self) -> Vec<Cmd> {
        match self {
            Cmd::None => Vec::new(),
            Cmd::Batch(cmds) => cmds.into_iter().flat_map(Cmd::flatten).collect(),
            cmd => vec![cmd],
        }
    }

    /// Check if this command triggers a layout pass
    pub fn needs_layout(&self) -> bool {
        match self {
            Cmd::Relayout { .. } | Cmd::TabActivated(_) | Cmd::FullRedraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_layout()),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_keeps_order_and_drops_none() {
        let cmd = Cmd::Batch(vec![
            Cmd::DestroyPanels(vec![PanelHandle(3)]),
            Cmd::None,
            Cmd::Batch(vec![Cmd::TabActivated(PageId(1)), Cmd::Autosave]),
        ]);
        assert_eq!(
            cmd.flatten(),
            vec![
                Cmd::DestroyPanels(vec![PanelHandle(3)]),
                Cmd::TabActivated(PageId(1)),
                Cmd::Autosave,
            ]
        );
    }

    #[test]
    fn test_needs_layout_looks_inside_batches() {
        assert!(!Cmd::Autosave.needs_layout());
        assert!(Cmd::Batch(vec![Cmd::Autosave, Cmd::FullRedraw]).needs_layout());
    }
}
