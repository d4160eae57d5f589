//! Focus & redraw coordination after a batch commits
//!
//! Only panels whose rectangle or visibility changed since the previous pass
//! are repainted; a full-window repaint is never issued. A pass marked as a
//! full redraw (after a resize rather than a tab click) additionally forces
//! both views' root surfaces to update immediately.

use std::collections::HashMap;

use crate::host::{Placement, WindowHost};
use crate::model::PanelHandle;

use super::positioner::BatchEntry;

/// Placements applied by earlier passes, keyed by panel
pub type AppliedPlacements = HashMap<PanelHandle, Placement>;

/// Panels shown by this pass whose placement differs from the last applied one
pub fn changed_panels(previous: &AppliedPlacements, entries: &[BatchEntry]) -> Vec<PanelHandle> {
    entries
        .iter()
        .filter(|e| e.placement.is_shown())
        .filter(|e| previous.get(&e.panel) != Some(&e.placement))
        .map(|e| e.panel)
        .collect()
}

/// Record what a committed batch applied
pub fn remember(previous: &mut AppliedPlacements, entries: &[BatchEntry]) {
    for entry in entries {
        previous.insert(entry.panel, entry.placement);
    }
}

/// Give keyboard focus back to the active edit surface if it is showing
pub fn restore_focus(host: &mut dyn WindowHost, content: Option<PanelHandle>) -> Option<PanelHandle> {
    let content = content.filter(|c| host.is_visible(*c))?;
    host.set_focus(content);
    Some(content)
}

/// Issue targeted repaints, plus immediate updates of `roots` on full redraw
pub fn repaint(
    host: &mut dyn WindowHost,
    changed: &[PanelHandle],
    roots: &[PanelHandle],
    full_redraw: bool,
) {
    for panel in changed {
        host.invalidate(*panel);
    }
    if full_redraw {
        for root in roots {
            host.update_now(*root);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ZOrder;
    use crate::layout::positioner::PanelRole;
    use crate::model::{PageId, Rect};

    fn shown(panel: u64, rect: Rect) -> BatchEntry {
        BatchEntry {
            panel: PanelHandle(panel),
            role: PanelRole::Content(PageId(panel)),
            placement: Placement::Show(rect),
            z: ZOrder::Top,
        }
    }

    #[test]
    fn test_unchanged_panels_are_not_repainted() {
        let mut previous = AppliedPlacements::new();
        let first = vec![shown(1, Rect::new(0, 0, 10, 10)), shown(2, Rect::new(10, 0, 5, 5))];
        assert_eq!(changed_panels(&previous, &first).len(), 2);
        remember(&mut previous, &first);

        let second = vec![shown(1, Rect::new(0, 0, 10, 10)), shown(2, Rect::new(10, 0, 6, 5))];
        assert_eq!(changed_panels(&previous, &second), vec![PanelHandle(2)]);
    }

    #[test]
    fn test_hidden_panels_are_not_repainted() {
        let previous = AppliedPlacements::new();
        let entries = vec![BatchEntry {
            panel: PanelHandle(3),
            role: PanelRole::DocumentMap,
            placement: Placement::Hide,
            z: ZOrder::Bottom,
        }];
        assert!(changed_panels(&previous, &entries).is_empty());
    }
}
