//! Core library for wrapping flow layout (tag chips, thumbnails, toolbars).
//!
//! - Algorithm: greedy single pass; items keep input order, a line is committed when the next
//!   item would cross the line width, then aligned (start/center/end per axis) and stacked
//! - Pipeline: `pack` takes measured items and returns placements, lines and a bounding size
//! - Data model is serde-serializable; JSON exporters and an optional PNG preview are provided
//!
//! Quick example:
//! ```
//! use flow_packer_core::{FlowConfig, pack_layout};
//! let cfg = FlowConfig::builder().with_max_width(100.0).spacing(10.0, 10.0).build();
//! let out = pack_layout(vec![("a", 50.0, 20.0), ("b", 60.0, 20.0), ("c", 50.0, 20.0)], &cfg);
//! assert_eq!(out.lines.len(), 3);
//! assert_eq!(out.size.h, 80.0);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod measure;
pub mod model;
pub mod packer;
pub mod pipeline;
#[cfg(feature = "image")]
pub mod preview;

pub use config::*;
pub use error::*;
pub use export::*;
pub use measure::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
#[cfg(feature = "image")]
pub use preview::*;

/// Convenience prelude for common types and functions.
/// Importing `flow_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        FlowConfig, FlowConfigBuilder, HorizontalAlignment, LineAlignment, Spacing,
        VerticalAlignment,
    };
    pub use crate::measure::{ChipMetrics, Measure, RECIPE_CATEGORIES, measure_items};
    pub use crate::model::{Frame, Item, Line, PackResult, PackStats, Point, Rect, Size};
    pub use crate::packer::{FlowPacker, LinePacker};
    pub use crate::pipeline::LayoutItem;
    pub use crate::{pack, pack_layout, pack_layout_items, pack_widths};
}
