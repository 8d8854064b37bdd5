use serde::{Deserialize, Serialize};

/// Width/height pair in layout units (points).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const ZERO: Size = Size { w: 0.0, h: 0.0 };

    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Returns the size with negative and non-finite components replaced by 0.
    pub fn normalized(self) -> Self {
        Self {
            w: non_negative(self.w),
            h: non_negative(self.h),
        }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }
}

/// Top-left offset in layout units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle. `x,y` is top-left; `w,h` are sizes.
/// Edges are exclusive: `max_x() == x + w`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }
    /// Right edge (`x + w`).
    pub fn max_x(&self) -> f64 {
        self.x + self.w
    }
    /// Bottom edge (`y + h`).
    pub fn max_y(&self) -> f64 {
        self.y + self.h
    }
    /// Returns true if the interiors of `self` and `r` intersect. Touching edges do not count.
    pub fn overlaps(&self, r: &Rect) -> bool {
        self.x < r.max_x() && r.x < self.max_x() && self.y < r.max_y() && r.y < self.max_y()
    }
    pub fn translated(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}

/// A measured input: opaque key plus its natural size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item<K = String> {
    pub key: K,
    pub size: Size,
}

impl<K> Item<K> {
    pub fn new(key: K, w: f64, h: f64) -> Self {
        Self {
            key,
            size: Size::new(w, h),
        }
    }
}

/// A placed item within the layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Frame<K = String> {
    /// User-specified key (e.g., label or asset path).
    pub key: K,
    /// Placed rectangle relative to the layout origin (clamped width, natural height).
    pub frame: Rect,
    /// Measured size after normalization (negative/non-finite components become 0).
    pub natural: Size,
    /// True if the width was capped at the line width.
    pub clamped: bool,
    /// Index of the line this item was placed on.
    pub line: usize,
}

/// Summary of one committed line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Line {
    /// First frame index (inclusive).
    pub start: usize,
    /// Last frame index (exclusive).
    pub end: usize,
    /// Top of the line band.
    pub y: f64,
    /// Tallest item on the line.
    pub height: f64,
    /// Used width before alignment (`max(x + w)` over the line).
    pub width: f64,
    /// Horizontal offset added to every item by the line alignment.
    pub offset: f64,
}

impl Line {
    pub fn len(&self) -> usize {
        self.end - self.start
    }
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Output of a layout pass: one frame per input item (input order), line summaries and bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackResult<K = String> {
    pub frames: Vec<Frame<K>>,
    pub lines: Vec<Line>,
    /// Bounding size of all placed frames.
    pub size: Size,
    /// Line width the items were wrapped against.
    pub max_width: f64,
}

impl<K> PackResult<K> {
    pub fn empty() -> Self {
        Self {
            frames: Vec::new(),
            lines: Vec::new(),
            size: Size::ZERO,
            max_width: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames belonging to `line`.
    pub fn line_frames(&self, line: &Line) -> &[Frame<K>] {
        &self.frames[line.start..line.end]
    }

    /// Moves every frame into a container whose top-left corner is `origin`.
    /// Line bands are shifted vertically as well. `Line::offset` stays the alignment offset and
    /// the bounding size is unchanged.
    pub fn placed_in(mut self, origin: Point) -> Self {
        for f in &mut self.frames {
            f.frame = f.frame.translated(origin.x, origin.y);
        }
        for line in &mut self.lines {
            line.y += origin.y;
        }
        self
    }

    /// Computes layout statistics.
    pub fn stats(&self) -> PackStats {
        let mut used_area = 0.0;
        let mut num_clamped = 0;
        for f in &self.frames {
            used_area += f.frame.w * f.frame.h;
            if f.clamped {
                num_clamped += 1;
            }
        }
        let bounding_area = self.size.area();
        let occupancy = if bounding_area > 0.0 {
            used_area / bounding_area
        } else {
            0.0
        };
        let avg_line_fill = if !self.lines.is_empty() && self.max_width > 0.0 {
            let total: f64 = self.lines.iter().map(|l| l.width / self.max_width).sum();
            total / self.lines.len() as f64
        } else {
            0.0
        };
        PackStats {
            num_items: self.frames.len(),
            num_lines: self.lines.len(),
            num_clamped,
            width: self.size.w,
            height: self.size.h,
            bounding_area,
            used_area,
            occupancy,
            avg_line_fill,
        }
    }
}

impl<K> Default for PackResult<K> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Statistics about a layout pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PackStats {
    pub num_items: usize,
    pub num_lines: usize,
    /// Items whose width was capped at the line width.
    pub num_clamped: usize,
    /// Bounding size.
    pub width: f64,
    pub height: f64,
    pub bounding_area: f64,
    /// Sum of placed frame areas.
    pub used_area: f64,
    /// used_area / bounding_area (0.0 to 1.0); 0 for an empty layout.
    pub occupancy: f64,
    /// Mean of `line.width / max_width` over all lines.
    pub avg_line_fill: f64,
}

impl PackStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Items: {}, Lines: {}, Size: {:.1}x{:.1}, Occupancy: {:.2}%, Line fill: {:.2}%, Clamped: {}",
            self.num_items,
            self.num_lines,
            self.width,
            self.height,
            self.occupancy * 100.0,
            self.avg_line_fill * 100.0,
            self.num_clamped,
        )
    }

    /// Returns bounding area not covered by frames.
    pub fn wasted_area(&self) -> f64 {
        (self.bounding_area - self.used_area).max(0.0)
    }
}

pub(crate) fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
