use super::LinePacker;
use crate::config::{HorizontalAlignment, LineAlignment, Spacing, VerticalAlignment};
use crate::model::{Frame, Line, PackResult, Rect, Size, non_negative};

/// Item waiting on the open line; its final x/y depend on the line's slack and height.
#[derive(Debug)]
struct Pending<K> {
    key: K,
    x: f64,
    size: Size,
    natural: Size,
    clamped: bool,
}

/// Greedy single-pass line packer.
///
/// Items are appended to the open line until the next one would cross `max_width`; the line
/// is then committed (aligned and stacked below the previous one) and a new line starts.
pub struct FlowPacker<K> {
    max_width: f64,
    spacing: Spacing,
    alignment: LineAlignment,
    cursor_x: f64,
    line_top: f64,
    open: Vec<Pending<K>>,
    frames: Vec<Frame<K>>,
    lines: Vec<Line>,
}

impl<K> FlowPacker<K> {
    /// `max_width` is the already resolved line width; spacing is normalized to finite,
    /// non-negative values.
    pub fn new(max_width: f64, spacing: Spacing, alignment: LineAlignment) -> Self {
        Self {
            max_width: non_negative(max_width),
            spacing: Spacing::new(
                non_negative(spacing.horizontal),
                non_negative(spacing.vertical),
            ),
            alignment,
            cursor_x: 0.0,
            line_top: 0.0,
            open: Vec::new(),
            frames: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_capacity(mut self, n: usize) -> Self {
        self.frames.reserve(n);
        self
    }

    pub fn max_width(&self) -> f64 {
        self.max_width
    }

    /// Number of items placed so far, including the open line.
    pub fn placed(&self) -> usize {
        self.frames.len() + self.open.len()
    }

    fn commit_line(&mut self) {
        if self.open.is_empty() {
            return;
        }
        let height = self.open.iter().fold(0.0_f64, |m, p| m.max(p.size.h));
        let used = self
            .open
            .iter()
            .fold(0.0_f64, |m, p| m.max(p.x + p.size.w));
        let slack = self.max_width - used;
        let offset = match self.alignment.horizontal {
            HorizontalAlignment::Start => 0.0,
            HorizontalAlignment::Center => slack / 2.0,
            HorizontalAlignment::End => slack,
        };
        let line_index = self.lines.len();
        let start = self.frames.len();
        let top = self.line_top;
        let vertical = self.alignment.vertical;
        for p in self.open.drain(..) {
            let diff = height - p.size.h;
            let dy = match vertical {
                VerticalAlignment::Start => 0.0,
                VerticalAlignment::Center => diff / 2.0,
                VerticalAlignment::End => diff,
            };
            self.frames.push(Frame {
                key: p.key,
                frame: Rect::new(p.x + offset, top + dy, p.size.w, p.size.h),
                natural: p.natural,
                clamped: p.clamped,
                line: line_index,
            });
        }
        self.lines.push(Line {
            start,
            end: self.frames.len(),
            y: top,
            height,
            width: used,
            offset,
        });
        self.line_top += height + self.spacing.vertical;
        self.cursor_x = 0.0;
    }
}

impl<K> LinePacker<K> for FlowPacker<K> {
    fn push(&mut self, key: K, natural: Size) {
        let natural = natural.normalized();
        let w = natural.w.min(self.max_width);
        // exact fit (`x + w == max_width`) stays on the line
        if self.cursor_x + w > self.max_width && !self.open.is_empty() {
            self.commit_line();
        }
        self.open.push(Pending {
            key,
            x: self.cursor_x,
            size: Size::new(w, natural.h),
            natural,
            clamped: w < natural.w,
        });
        self.cursor_x += w + self.spacing.horizontal;
    }

    fn finish(mut self) -> PackResult<K> {
        self.commit_line();
        let (mut width, mut height) = (0.0_f64, 0.0_f64);
        for f in &self.frames {
            width = width.max(f.frame.max_x());
            height = height.max(f.frame.max_y());
        }
        PackResult {
            frames: self.frames,
            lines: self.lines,
            size: Size::new(width, height),
            max_width: self.max_width,
        }
    }
}
