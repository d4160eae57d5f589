//! Pixel geometry primitives shared by every layout stage
//!
//! All rectangles are in client coordinates (DPI-scaled pixels). Widths and
//! heights are never negative; constructors clamp them to zero so a cramped
//! window degrades to empty regions instead of inverted ones.

use serde::{Deserialize, Serialize};

/// Rectangle for layout calculations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Rectangle anchored at the origin, as returned for a window client area
    pub fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// True when the rectangle covers no pixels (minimized window, collapsed region)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlap of two rectangles, `None` when they only touch or are disjoint
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Split off a band of `height` pixels from the top.
    /// Returns (band, remainder).
    pub fn take_top(&self, height: i32) -> (Rect, Rect) {
        let band = height.clamp(0, self.height);
        (
            Rect::new(self.x, self.y, self.width, band),
            Rect::new(self.x, self.y + band, self.width, self.height - band),
        )
    }

    /// Split off a column of `width` pixels from the trailing (right) edge.
    /// Returns (remainder, column).
    pub fn take_right(&self, width: i32) -> (Rect, Rect) {
        let column = width.clamp(0, self.width);
        (
            Rect::new(self.x, self.y, self.width - column, self.height),
            Rect::new(self.right() - column, self.y, column, self.height),
        )
    }
}

/// Orientation of a splitter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Divides left from right (a vertical bar)
    Vertical,
    /// Divides top from bottom (a horizontal bar)
    Horizontal,
}

/// Split `rect` top-to-bottom into (first, gap, second).
///
/// `ratio` is the share of the space left after the gap that goes to the
/// first region. The first region never shrinks below `min_first` unless the
/// whole rectangle is smaller than that. The three parts always tile `rect`
/// exactly.
pub fn split_vertical(rect: Rect, ratio: f32, min_first: i32, gap: i32) -> (Rect, Rect, Rect) {
    let gap = gap.clamp(0, rect.height);
    let available = rect.height - gap;
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let wanted = (available as f32 * ratio).round() as i32;
    let first = wanted.max(min_first.min(available)).min(available);
    let second = available - first;

    (
        Rect::new(rect.x, rect.y, rect.width, first),
        Rect::new(rect.x, rect.y + first, rect.width, gap),
        Rect::new(rect.x, rect.y + first + gap, rect.width, second),
    )
}

/// Split `rect` left-to-right into (first, gap, second), same contract as
/// [`split_vertical`].
pub fn split_horizontal(rect: Rect, ratio: f32, min_first: i32, gap: i32) -> (Rect, Rect, Rect) {
    let gap = gap.clamp(0, rect.width);
    let available = rect.width - gap;
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.5
    };
    let wanted = (available as f32 * ratio).round() as i32;
    let first = wanted.max(min_first.min(available)).min(available);
    let second = available - first;

    (
        Rect::new(rect.x, rect.y, first, rect.height),
        Rect::new(rect.x + first, rect.y, gap, rect.height),
        Rect::new(rect.x + first + gap, rect.y, second, rect.height),
    )
}
