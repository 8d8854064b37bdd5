use crate::error::{FlowError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Horizontal placement of a line's items within the line width.
/// Slack (`max_width - used_width`) is added to every item's x: none, half, or all of it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl FromStr for HorizontalAlignment {
    type Err = FlowError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" | "leading" | "left" => Ok(Self::Start),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "end" | "trailing" | "right" => Ok(Self::End),
            other => Err(FlowError::Parse(format!(
                "unknown horizontal alignment: {other}"
            ))),
        }
    }
}

/// Vertical placement of an item within its line band (the tallest item's height).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl FromStr for VerticalAlignment {
    type Err = FlowError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "start" | "top" => Ok(Self::Start),
            "center" | "centre" | "middle" => Ok(Self::Center),
            "end" | "bottom" => Ok(Self::End),
            other => Err(FlowError::Parse(format!(
                "unknown vertical alignment: {other}"
            ))),
        }
    }
}

/// Per-axis line alignment. The default is top-leading.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineAlignment {
    #[serde(default)]
    pub horizontal: HorizontalAlignment,
    #[serde(default)]
    pub vertical: VerticalAlignment,
}

impl LineAlignment {
    pub const TOP_LEADING: LineAlignment = LineAlignment::new(
        HorizontalAlignment::Start,
        VerticalAlignment::Start,
    );
    pub const CENTER: LineAlignment = LineAlignment::new(
        HorizontalAlignment::Center,
        VerticalAlignment::Center,
    );

    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Accepts named alignments (`top_leading`, `center`, `bottom-trailing`, `topLeading`, ...)
/// or an explicit `horizontal:vertical` pair such as `center:end`.
impl FromStr for LineAlignment {
    type Err = FlowError;
    fn from_str(s: &str) -> Result<Self> {
        use HorizontalAlignment as H;
        use VerticalAlignment as V;
        if let Some((h, v)) = s.split_once(':') {
            return Ok(Self::new(h.trim().parse()?, v.trim().parse()?));
        }
        let name: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        let (h, v) = match name.as_str() {
            "topleading" => (H::Start, V::Start),
            "top" => (H::Center, V::Start),
            "toptrailing" => (H::End, V::Start),
            "leading" => (H::Start, V::Center),
            "center" => (H::Center, V::Center),
            "trailing" => (H::End, V::Center),
            "bottomleading" => (H::Start, V::End),
            "bottom" => (H::Center, V::End),
            "bottomtrailing" => (H::End, V::End),
            _ => {
                return Err(FlowError::Parse(format!("unknown line alignment: {s}")));
            }
        };
        Ok(Self::new(h, v))
    }
}

/// Gaps between items on a line (`horizontal`) and between lines (`vertical`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Spacing {
    pub fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v)
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self::uniform(DEFAULT_SPACING)
    }
}

/// Default gap between chips and between lines.
pub const DEFAULT_SPACING: f64 = 8.0;

/// Flow layout configuration.
/// Key notes:
///   - `max_width`: `None`, zero, negative or non-finite means "derive from content"
///     (the widest item's natural width)
///   - negative/non-finite spacing is treated as 0 by the packer; `validate` rejects it
///   - `parallel` only affects `pack_widths` when the `parallel` feature is enabled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowConfig {
    /// Line width to wrap against.
    #[serde(default)]
    pub max_width: Option<f64>,
    #[serde(default)]
    pub spacing: Spacing,
    #[serde(default)]
    pub line_alignment: LineAlignment,
    /// Evaluate width sweeps in parallel when feature "parallel" is on.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_width: None,
            spacing: Spacing::default(),
            line_alignment: LineAlignment::default(),
            parallel: default_parallel(),
        }
    }
}

impl FlowConfig {
    /// Strict check of the configuration.
    ///
    /// Packing itself never fails; this lets callers that take user input (CLI, config files)
    /// reject values the packer would otherwise silently normalize.
    pub fn validate(&self) -> Result<()> {
        if let Some(w) = self.max_width {
            if !w.is_finite() || w < 0.0 {
                return Err(FlowError::InvalidMaxWidth(w));
            }
        }
        let Spacing {
            horizontal,
            vertical,
        } = self.spacing;
        if !horizontal.is_finite() || !vertical.is_finite() || horizontal < 0.0 || vertical < 0.0 {
            return Err(FlowError::InvalidSpacing {
                horizontal,
                vertical,
            });
        }
        Ok(())
    }

    /// The explicit line width, if it constrains wrapping (finite and > 0).
    pub fn wrap_width(&self) -> Option<f64> {
        self.max_width.filter(|w| w.is_finite() && *w > 0.0)
    }

    /// Create a fluent builder for `FlowConfig`.
    pub fn builder() -> FlowConfigBuilder {
        FlowConfigBuilder::new()
    }
}

fn default_parallel() -> bool {
    false
}

/// Builder for `FlowConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct FlowConfigBuilder {
    cfg: FlowConfig,
}

impl FlowConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: FlowConfig::default(),
        }
    }
    pub fn with_max_width(mut self, w: f64) -> Self {
        self.cfg.max_width = Some(w);
        self
    }
    /// Wrap against the widest item instead of an external width.
    pub fn fit_content(mut self) -> Self {
        self.cfg.max_width = None;
        self
    }
    pub fn spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.cfg.spacing = Spacing::new(horizontal, vertical);
        self
    }
    pub fn horizontal_spacing(mut self, v: f64) -> Self {
        self.cfg.spacing.horizontal = v;
        self
    }
    pub fn vertical_spacing(mut self, v: f64) -> Self {
        self.cfg.spacing.vertical = v;
        self
    }
    pub fn line_alignment(mut self, v: LineAlignment) -> Self {
        self.cfg.line_alignment = v;
        self
    }
    pub fn align_horizontal(mut self, v: HorizontalAlignment) -> Self {
        self.cfg.line_alignment.horizontal = v;
        self
    }
    pub fn align_vertical(mut self, v: VerticalAlignment) -> Self {
        self.cfg.line_alignment.vertical = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> FlowConfig {
        self.cfg
    }
}
