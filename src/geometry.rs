use serde::{Deserialize, Serialize};

/// Number of cells along each axis of a drill split.
pub const GRID_DIVISIONS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in virtual-screen pixels. `right` and `bottom` are
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    /// Zero-area region; reported to observers to mean "nothing to show".
    pub const EMPTY: Self = Self::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(width),
            top.saturating_add(height),
        )
    }

    /// Saturates instead of overflowing for spans wider than `i32::MAX`.
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.left + self.width() / 2,
            self.top + self.height() / 2,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Width and height of one cell of the 3×3 split, truncated.
    pub fn cell_size(&self) -> (i32, i32) {
        (self.width() / GRID_DIVISIONS, self.height() / GRID_DIVISIONS)
    }

    /// Sub-cell `(col, row)` of the 3×3 split. Cells are laid out from `left`
    /// and `top` with truncated sizes, so remainder pixels past the third cell
    /// are never part of any cell.
    pub fn cell(&self, col: u8, row: u8) -> Self {
        let (cell_w, cell_h) = self.cell_size();
        let col = i32::from(col);
        let row = i32::from(row);
        Self::new(
            self.left + col * cell_w,
            self.top + row * cell_h,
            self.left + (col + 1) * cell_w,
            self.top + (row + 1) * cell_h,
        )
    }

    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.left.saturating_add(dx),
            self.top.saturating_add(dy),
            self.right.saturating_add(dx),
            self.bottom.saturating_add(dy),
        )
    }

    /// Shift `self` so it lies inside `outer`, preserving size. Each axis is
    /// handled on its own; the min edge wins when `self` is larger than `outer`.
    pub fn clamped_within(&self, outer: &Self) -> Self {
        let (left, right) = clamp_span(self.left, self.right, outer.left, outer.right);
        let (top, bottom) = clamp_span(self.top, self.bottom, outer.top, outer.bottom);
        Self::new(left, top, right, bottom)
    }

    /// Smallest region covering both inputs. Empty inputs are ignored.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

fn clamp_span(min: i32, max: i32, bound_min: i32, bound_max: i32) -> (i32, i32) {
    if min < bound_min {
        let shift = bound_min - min;
        return (bound_min, max + shift);
    }
    if max > bound_max {
        let shift = max - bound_max;
        return (min - shift, bound_max);
    }
    (min, max)
}
