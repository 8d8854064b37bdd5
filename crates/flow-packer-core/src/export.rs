use crate::model::{Frame, Line, PackResult};
use serde_json::{Value, json};

fn frame_value<K>(fr: &Frame<K>) -> (Value, Value) {
    let frame = json!({"x": fr.frame.x, "y": fr.frame.y, "w": fr.frame.w, "h": fr.frame.h});
    let natural = json!({"w": fr.natural.w, "h": fr.natural.h});
    (frame, natural)
}

fn line_value(line: &Line) -> Value {
    json!({
        "start": line.start,
        "end": line.end,
        "y": line.y,
        "height": line.height,
        "width": line.width,
        "offset": line.offset,
    })
}

/// Serialize the layout as `{ size, maxWidth, lines, items }` with items in input order.
/// Suitable for renderers that walk the placements sequentially.
pub fn to_json_array<K: ToString>(out: &PackResult<K>) -> Value {
    let items: Vec<Value> = out
        .frames
        .iter()
        .map(|fr| {
            let (frame, natural) = frame_value(fr);
            json!({
                "key": fr.key.to_string(),
                "frame": frame,
                "naturalSize": natural,
                "clamped": fr.clamped,
                "line": fr.line,
            })
        })
        .collect();
    let lines: Vec<Value> = out.lines.iter().map(line_value).collect();
    json!({
        "size": {"w": out.size.w, "h": out.size.h},
        "maxWidth": out.max_width,
        "lines": lines,
        "items": items,
    })
}

/// Frames keyed by name: `{ size, frames: { key: { frame, naturalSize, clamped, line, index } } }`.
/// When keys repeat, the last item wins.
pub fn to_json_hash<K: ToString>(out: &PackResult<K>) -> Value {
    let mut frames = serde_json::Map::new();
    for (index, fr) in out.frames.iter().enumerate() {
        let (frame, natural) = frame_value(fr);
        frames.insert(
            fr.key.to_string(),
            json!({
                "frame": frame,
                "naturalSize": natural,
                "clamped": fr.clamped,
                "line": fr.line,
                "index": index,
            }),
        );
    }
    json!({
        "size": {"w": out.size.w, "h": out.size.h},
        "frames": frames,
    })
}
