//! In-memory window host
//!
//! Tracks rectangle, visibility and z-order of every surface it was asked to
//! place, and records each committed batch so callers can inspect exactly
//! what a layout pass did. Failure injection covers the host error paths.

use std::collections::{HashMap, HashSet};

use crate::error::LayoutError;
use crate::messages::Msg;
use crate::model::{PanelHandle, Rect};

use super::{LayoutTransaction, Placement, ScrollRequest, WindowHost, ZOrder};

/// Last applied state of one surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    pub rect: Rect,
    pub visible: bool,
}

/// One committed batch
#[derive(Debug, Clone, PartialEq)]
pub struct CommitRecord {
    pub capacity: usize,
    pub entries: Vec<(PanelHandle, Placement, ZOrder)>,
}

#[derive(Debug)]
pub struct MemoryHost {
    client: Rect,
    scale: f64,
    panels: HashMap<PanelHandle, PanelState>,
    /// Back-most first
    z_stack: Vec<PanelHandle>,
    destroyed: HashSet<PanelHandle>,
    focus: Option<PanelHandle>,

    pub commits: Vec<CommitRecord>,
    pub invalidated: Vec<PanelHandle>,
    pub updated: Vec<PanelHandle>,
    pub scrolls: Vec<ScrollRequest>,

    /// Refuse the next `begin_batch`
    pub fail_next_begin: bool,
    /// Refuse the next `commit`
    pub fail_next_commit: bool,
    /// Let this many commits through, then refuse the one after
    pub fail_commit_after: Option<usize>,

    posted: Vec<Msg>,
    /// Messages delivered as if they arrived while the next batch commits
    post_on_commit: Vec<Msg>,
}

impl MemoryHost {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            client: Rect::from_size(width, height),
            scale: 1.0,
            panels: HashMap::new(),
            z_stack: Vec::new(),
            destroyed: HashSet::new(),
            focus: None,
            commits: Vec::new(),
            invalidated: Vec::new(),
            updated: Vec::new(),
            scrolls: Vec::new(),
            fail_next_begin: false,
            fail_next_commit: false,
            fail_commit_after: None,
            posted: Vec::new(),
            post_on_commit: Vec::new(),
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.client = Rect::from_size(width, height);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn panel(&self, panel: PanelHandle) -> Option<PanelState> {
        self.panels.get(&panel).copied()
    }

    /// Every surface currently shown
    pub fn visible_panels(&self) -> Vec<PanelHandle> {
        let mut visible: Vec<PanelHandle> = self
            .panels
            .iter()
            .filter(|(_, s)| s.visible)
            .map(|(h, _)| *h)
            .collect();
        visible.sort();
        visible
    }

    pub fn focused(&self) -> Option<PanelHandle> {
        self.focus
    }

    /// Position in the z-order, 0 being back-most
    pub fn z_index(&self, panel: PanelHandle) -> Option<usize> {
        self.z_stack.iter().position(|p| *p == panel)
    }

    pub fn top_most(&self) -> Option<PanelHandle> {
        self.z_stack.last().copied()
    }

    /// Queue a message the shell will see once the next batch commits
    pub fn post_during_next_commit(&mut self, msg: Msg) {
        self.post_on_commit.push(msg);
    }

    /// Post a message to the shell immediately
    pub fn post(&mut self, msg: Msg) {
        self.posted.push(msg);
    }

    pub fn clear_records(&mut self) {
        self.commits.clear();
        self.invalidated.clear();
        self.updated.clear();
        self.scrolls.clear();
    }

    fn apply(&mut self, panel: PanelHandle, placement: Placement, z: ZOrder) {
        if self.destroyed.contains(&panel) {
            return;
        }
        let state = self.panels.entry(panel).or_default();
        match placement {
            Placement::Show(rect) => {
                state.rect = rect;
                state.visible = true;
            }
            Placement::Hide => state.visible = false,
        }

        self.z_stack.retain(|p| *p != panel);
        match z {
            ZOrder::Top => self.z_stack.push(panel),
            ZOrder::Bottom => self.z_stack.insert(0, panel),
        }
    }
}

struct MemoryTransaction<'a> {
    host: &'a mut MemoryHost,
    capacity: usize,
    staged: Vec<(PanelHandle, Placement, ZOrder)>,
}

impl LayoutTransaction for MemoryTransaction<'_> {
    fn add(&mut self, panel: PanelHandle, placement: Placement, z: ZOrder) {
        self.staged.push((panel, placement, z));
    }

    fn commit(self: Box<Self>) -> Result<(), LayoutError> {
        let MemoryTransaction {
            host,
            capacity,
            staged,
        } = *self;

        let countdown_hit = match host.fail_commit_after {
            Some(0) => {
                host.fail_commit_after = None;
                true
            }
            Some(n) => {
                host.fail_commit_after = Some(n - 1);
                false
            }
            None => false,
        };
        if std::mem::take(&mut host.fail_next_commit) || countdown_hit {
            return Err(LayoutError::CommitFailed(format!(
                "{} staged placements rejected",
                staged.len()
            )));
        }

        for (panel, placement, z) in &staged {
            host.apply(*panel, *placement, *z);
        }
        host.commits.push(CommitRecord {
            capacity,
            entries: staged,
        });
        let arrived = std::mem::take(&mut host.post_on_commit);
        host.posted.extend(arrived);
        Ok(())
    }
}

impl WindowHost for MemoryHost {
    fn client_rect(&self) -> Rect {
        self.client
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn is_live(&self, panel: PanelHandle) -> bool {
        !self.destroyed.contains(&panel)
    }

    fn is_visible(&self, panel: PanelHandle) -> bool {
        self.panels.get(&panel).is_some_and(|s| s.visible)
    }

    fn begin_batch(
        &mut self,
        capacity: usize,
    ) -> Result<Box<dyn LayoutTransaction + '_>, LayoutError> {
        if std::mem::take(&mut self.fail_next_begin) {
            return Err(LayoutError::BatchUnavailable { panels: capacity });
        }
        Ok(Box::new(MemoryTransaction {
            host: self,
            capacity,
            staged: Vec::with_capacity(capacity),
        }))
    }

    fn set_focus(&mut self, panel: PanelHandle) {
        if self.is_live(panel) {
            self.focus = Some(panel);
        }
    }

    fn destroy(&mut self, panel: PanelHandle) {
        self.destroyed.insert(panel);
        self.panels.remove(&panel);
        self.z_stack.retain(|p| *p != panel);
        if self.focus == Some(panel) {
            self.focus = None;
        }
    }

    fn invalidate(&mut self, panel: PanelHandle) {
        self.invalidated.push(panel);
    }

    fn update_now(&mut self, panel: PanelHandle) {
        self.updated.push(panel);
    }

    fn scroll(&mut self, request: ScrollRequest) {
        self.scrolls.push(request);
    }

    fn take_posted(&mut self) -> Vec<Msg> {
        std::mem::take(&mut self.posted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_commit_applies_nothing() {
        let mut host = MemoryHost::new(100, 100);
        host.fail_next_commit = true;
        let mut batch = host.begin_batch(1).unwrap();
        batch.add(
            PanelHandle(7),
            Placement::Show(Rect::new(0, 0, 10, 10)),
            ZOrder::Top,
        );
        assert!(batch.commit().is_err());
        assert!(host.panel(PanelHandle(7)).is_none());
        assert!(host.commits.is_empty());
    }

    #[test]
    fn test_commit_countdown_refuses_only_the_nth() {
        let mut host = MemoryHost::new(100, 100);
        host.fail_commit_after = Some(1);
        let results: Vec<bool> = (0..3)
            .map(|i| {
                let mut batch = host.begin_batch(1).unwrap();
                batch.add(PanelHandle(i), Placement::Hide, ZOrder::Top);
                batch.commit().is_ok()
            })
            .collect();
        assert_eq!(results, vec![true, false, true]);
        assert_eq!(host.commits.len(), 2);
        assert_eq!(host.fail_commit_after, None);
    }

    #[test]
    fn test_z_order_follows_submission() {
        let mut host = MemoryHost::new(100, 100);
        let mut batch = host.begin_batch(3).unwrap();
        batch.add(PanelHandle(1), Placement::Hide, ZOrder::Bottom);
        batch.add(PanelHandle(2), Placement::Show(Rect::default()), ZOrder::Top);
        batch.add(PanelHandle(3), Placement::Show(Rect::default()), ZOrder::Top);
        batch.commit().unwrap();
        assert_eq!(host.z_index(PanelHandle(1)), Some(0));
        assert_eq!(host.top_most(), Some(PanelHandle(3)));
        assert_eq!(host.visible_panels(), vec![PanelHandle(2), PanelHandle(3)]);
    }

    #[test]
    fn test_destroyed_panels_are_not_live() {
        let mut host = MemoryHost::new(100, 100);
        host.destroy(PanelHandle(4));
        assert!(!host.is_live(PanelHandle(4)));
        host.set_focus(PanelHandle(4));
        assert_eq!(host.focused(), None);
    }
}
