use crate::error::{FlowError, Result};
use crate::model::{PackResult, Rect, Size};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Largest canvas [`render_preview`] allocates, in pixels.
pub const MAX_PREVIEW_PIXELS: u64 = 1 << 26;

/// Options for [`render_preview`].
#[derive(Debug, Clone)]
pub struct PreviewOptions {
    /// Pixels per layout unit.
    pub scale: f64,
    pub background: [u8; 4],
    /// Fill colours, cycled per item in input order.
    pub palette: Vec<[u8; 4]>,
    /// Draw a 1px outline around each item.
    pub outlines: bool,
    pub outline_color: [u8; 4],
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: [255, 255, 255, 255],
            palette: vec![
                [66, 133, 244, 255],
                [251, 140, 0, 255],
                [67, 160, 71, 255],
                [253, 216, 53, 255],
                [141, 110, 99, 255],
                [38, 166, 154, 255],
                [92, 107, 192, 255],
                [0, 172, 193, 255],
                [158, 158, 158, 255],
                [236, 64, 122, 255],
            ],
            outlines: false,
            outline_color: [255, 0, 0, 255],
        }
    }
}

/// Pixel bounds `[x0, x1) x [y0, y1)` of `r` after scaling, clipped to the canvas.
fn pixel_bounds(r: &Rect, scale: f64, cw: u32, ch: u32) -> (u32, u32, u32, u32) {
    let clip = |v: f64, max: u32| -> u32 {
        let v = (v * scale).round();
        if v.is_nan() || v <= 0.0 {
            0
        } else if v >= max as f64 {
            max
        } else {
            v as u32
        }
    };
    (
        clip(r.x, cw),
        clip(r.max_x(), cw),
        clip(r.y, ch),
        clip(r.max_y(), ch),
    )
}

/// Canvas dimensions for `size` at `scale`: `ceil(size * scale)` per side, at least 1x1.
fn canvas_dims(size: Size, scale: f64) -> Result<(u32, u32)> {
    let side = |v: f64| -> Option<u32> {
        let px = (v * scale).ceil();
        if px.is_finite() && px <= u32::MAX as f64 {
            Some((px as u32).max(1))
        } else {
            None
        }
    };
    match (side(size.w), side(size.h)) {
        (Some(w), Some(h)) if u64::from(w) * u64::from(h) <= MAX_PREVIEW_PIXELS => Ok((w, h)),
        _ => Err(FlowError::InvalidConfig(format!(
            "preview of {:.1}x{:.1} at scale {} exceeds {} pixels",
            size.w, size.h, scale, MAX_PREVIEW_PIXELS
        ))),
    }
}

/// Render the layout as filled boxes on a canvas of `ceil(size * scale)` pixels (at least 1x1).
/// Frames reaching outside the canvas are clipped. A non-positive or non-finite scale means 1.0.
///
/// Fails with [`FlowError::InvalidConfig`] when the canvas would exceed [`MAX_PREVIEW_PIXELS`].
pub fn render_preview<K>(out: &PackResult<K>, opts: &PreviewOptions) -> Result<RgbaImage> {
    let scale = if opts.scale.is_finite() && opts.scale > 0.0 {
        opts.scale
    } else {
        1.0
    };
    let (cw, ch) = canvas_dims(out.size, scale)?;
    let mut canvas = RgbaImage::from_pixel(cw, ch, Rgba(opts.background));

    for (i, fr) in out.frames.iter().enumerate() {
        let (x0, x1, y0, y1) = pixel_bounds(&fr.frame, scale, cw, ch);
        if x0 >= x1 || y0 >= y1 {
            continue;
        }
        if let Some(fill) = opts.palette.get(i % opts.palette.len().max(1)) {
            for yy in y0..y1 {
                for xx in x0..x1 {
                    canvas.put_pixel(xx, yy, Rgba(*fill));
                }
            }
        }
        if opts.outlines {
            let c = Rgba(opts.outline_color);
            for xx in x0..x1 {
                canvas.put_pixel(xx, y0, c);
                canvas.put_pixel(xx, y1 - 1, c);
            }
            for yy in y0..y1 {
                canvas.put_pixel(x0, yy, c);
                canvas.put_pixel(x1 - 1, yy, c);
            }
        }
    }
    Ok(canvas)
}

/// Render and write a PNG preview to `path`.
pub fn save_preview<K>(out: &PackResult<K>, opts: &PreviewOptions, path: &Path) -> Result<()> {
    render_preview(out, opts)?.save(path)?;
    Ok(())
}
