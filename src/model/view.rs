//! Views - the two top-level tab-strip containers

use serde::{Deserialize, Serialize};

use super::page::PageId;
use super::registry::PanelHandle;

/// Which of the two views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSide {
    Main,
    Slave,
}

impl ViewSide {
    /// Both sides in layout order (left to right)
    pub const ALL: [ViewSide; 2] = [ViewSide::Main, ViewSide::Slave];

    pub fn other(&self) -> ViewSide {
        match self {
            ViewSide::Main => ViewSide::Slave,
            ViewSide::Slave => ViewSide::Main,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ViewSide::Main => "main",
            ViewSide::Slave => "slave",
        }
    }
}

/// A tab-strip container hosting an ordered set of pages
#[derive(Debug, Clone)]
pub struct View {
    pub side: ViewSide,
    /// Root surface of the view (its tab strip)
    pub tab_strip: PanelHandle,
    /// Pages in tab order
    pub pages: Vec<PageId>,
    pub focused: Option<PageId>,
    pub visible: bool,
}

impl View {
    pub fn new(side: ViewSide, tab_strip: PanelHandle) -> Self {
        Self {
            side,
            tab_strip,
            pages: Vec::new(),
            focused: None,
            visible: true,
        }
    }

    pub fn contains(&self, page: PageId) -> bool {
        self.pages.contains(&page)
    }

    pub fn is_focused(&self, page: PageId) -> bool {
        self.focused == Some(page)
    }

    /// Remove a page from tab order, moving focus to its neighbor if needed
    pub(crate) fn remove(&mut self, page: PageId) -> bool {
        let Some(index) = self.pages.iter().position(|p| *p == page) else {
            return false;
        };
        self.pages.remove(index);
        if self.focused == Some(page) {
            self.focused = if self.pages.is_empty() {
                None
            } else {
                Some(self.pages[index.min(self.pages.len() - 1)])
            };
        }
        true
    }
}
