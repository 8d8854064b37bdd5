use crate::config::FlowConfig;
use crate::error::{FlowError, Result};
use crate::model::{Item, PackResult, Size};
use crate::packer::{FlowPacker, LinePacker};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all, fields(items = items.len()))]
/// Lays out `items` into wrapped lines using `cfg` and returns one frame per item (input order),
/// the committed lines and the bounding size.
///
/// Notes:
/// - Never fails: negative/non-finite sizes and spacing are treated as 0.
/// - Without a usable `max_width` the widest item's natural width is used, so nothing is clamped.
/// - Deterministic: identical inputs give identical results.
pub fn pack<K: Clone>(items: &[Item<K>], cfg: &FlowConfig) -> PackResult<K> {
    let max_width = resolve_max_width(items, cfg);
    if items.is_empty() {
        return PackResult {
            max_width,
            ..PackResult::empty()
        };
    }
    let mut packer =
        FlowPacker::new(max_width, cfg.spacing, cfg.line_alignment).with_capacity(items.len());
    for it in items {
        packer.push(it.key.clone(), it.size);
    }
    let out = packer.finish();
    debug!(
        lines = out.lines.len(),
        width = out.size.w,
        height = out.size.h,
        max_width,
        "flow packed"
    );
    out
}

/// Line width used for wrapping: the configured width when usable, otherwise the widest
/// normalized natural width.
pub fn resolve_max_width<K>(items: &[Item<K>], cfg: &FlowConfig) -> f64 {
    cfg.wrap_width().unwrap_or_else(|| {
        items
            .iter()
            .fold(0.0_f64, |m, it| m.max(it.size.normalized().w))
    })
}

/// Packs `(key, w, h)` tuples. Convenience over [`pack`] for callers without their own item type.
pub fn pack_layout<K: Into<String>>(items: Vec<(K, f64, f64)>, cfg: &FlowConfig) -> PackResult {
    let items: Vec<Item> = items
        .into_iter()
        .map(|(k, w, h)| Item::new(k.into(), w, h))
        .collect();
    pack(&items, cfg)
}

/// Layout-only record, as read from item list files (`[{ "key": .., "w": .., "h": .. }]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutItem<K = String> {
    pub key: K,
    pub w: f64,
    pub h: f64,
}

/// Packs layout-only items.
pub fn pack_layout_items<K: Into<String>>(items: Vec<LayoutItem<K>>, cfg: &FlowConfig) -> PackResult {
    let items: Vec<Item> = items
        .into_iter()
        .map(|it| Item::new(it.key.into(), it.w, it.h))
        .collect();
    pack(&items, cfg)
}

/// Strict check of item sizes (negative or non-finite components).
/// [`pack`] accepts such items; this is for callers that want to reject bad input instead.
pub fn validate_items<K>(items: &[Item<K>]) -> Result<()> {
    for (index, it) in items.iter().enumerate() {
        let Size { w, h } = it.size;
        if !w.is_finite() || !h.is_finite() {
            return Err(FlowError::InvalidItem {
                index,
                reason: format!("non-finite size {w}x{h}"),
            });
        }
        if w < 0.0 || h < 0.0 {
            return Err(FlowError::InvalidItem {
                index,
                reason: format!("negative size {w}x{h}"),
            });
        }
    }
    Ok(())
}

#[instrument(skip_all, fields(items = items.len(), widths = widths.len()))]
/// Packs the same items against each width in `widths` (e.g. responsive breakpoints).
///
/// Results keep the order of `widths`. With feature "parallel" and `cfg.parallel`, the widths
/// are evaluated on the rayon pool.
pub fn pack_widths<K>(items: &[Item<K>], cfg: &FlowConfig, widths: &[f64]) -> Vec<(f64, PackResult<K>)>
where
    K: Clone + Send + Sync,
{
    let run = |w: f64| {
        let mut c = cfg.clone();
        c.max_width = Some(w);
        (w, pack(items, &c))
    };

    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            return widths.par_iter().map(|&w| run(w)).collect();
        }
    }

    widths.iter().map(|&w| run(w)).collect()
}

/// Narrowest of `widths` whose layout fits in `max_lines` lines, if any.
pub fn narrowest_width_within<K>(
    items: &[Item<K>],
    cfg: &FlowConfig,
    widths: &[f64],
    max_lines: usize,
) -> Option<f64>
where
    K: Clone + Send + Sync,
{
    pack_widths(items, cfg, widths)
        .into_iter()
        .filter(|(_, out)| out.lines.len() <= max_lines)
        .map(|(w, _)| w)
        .min_by(|a, b| a.total_cmp(b))
}
