use flow_packer_core::error::FlowError;
use flow_packer_core::prelude::*;
use flow_packer_core::{resolve_max_width, validate_items};

#[test]
fn test_empty_input() {
    let cfg = FlowConfig::builder().with_max_width(100.0).build();
    let out = pack::<String>(&[], &cfg);
    assert!(out.frames.is_empty());
    assert!(out.lines.is_empty());
    assert_eq!(out.size, Size::ZERO);
    assert_eq!(out.max_width, 100.0);
    assert_eq!(out.max_width, resolve_max_width::<String>(&[], &cfg));

    let out = pack_layout(Vec::<(String, f64, f64)>::new(), &FlowConfig::default());
    assert!(out.is_empty());
}

#[test]
fn test_negative_sizes_are_zeroed() {
    let cfg = FlowConfig::builder().with_max_width(100.0).spacing(0.0, 0.0).build();
    let out = pack_layout(vec![("neg", -20.0, -5.0), ("ok", 30.0, 10.0)], &cfg);
    assert_eq!(out.frames[0].frame.w, 0.0);
    assert_eq!(out.frames[0].frame.h, 0.0);
    assert_eq!(out.frames[0].natural, Size::ZERO);
    assert_eq!(out.frames[1].frame.x, 0.0);
    assert_eq!(out.size, Size::new(30.0, 10.0));
}

#[test]
fn test_non_finite_sizes_are_zeroed() {
    let cfg = FlowConfig::builder().with_max_width(100.0).build();
    let out = pack_layout(
        vec![("nan", f64::NAN, 10.0), ("inf", f64::INFINITY, f64::NEG_INFINITY)],
        &cfg,
    );
    for f in &out.frames {
        assert!(f.frame.x.is_finite() && f.frame.y.is_finite());
        assert!(f.frame.w.is_finite() && f.frame.h.is_finite());
    }
    assert_eq!(out.frames[1].frame.w, 0.0);
}

#[test]
fn test_degenerate_max_width_falls_back_to_content() {
    let items = vec![("a", 40.0, 10.0), ("b", 70.0, 10.0)];
    for w in [-10.0, f64::NAN, f64::INFINITY] {
        let cfg = FlowConfig::builder().with_max_width(w).build();
        let out = pack_layout(items.clone(), &cfg);
        assert_eq!(out.max_width, 70.0, "width {w}");
        assert_eq!(out.lines.len(), 2);
    }
}

#[test]
fn test_all_zero_width_items_with_spacing() {
    // content width is 0; after the first item the cursor sits at the spacing and everything wraps
    let cfg = FlowConfig::builder().spacing(8.0, 2.0).build();
    let out = pack_layout(vec![("a", 0.0, 5.0), ("b", 0.0, 5.0)], &cfg);
    assert_eq!(out.max_width, 0.0);
    assert_eq!(out.lines.len(), 2);
    assert_eq!(out.size, Size::new(0.0, 12.0));
}

#[test]
fn test_validate_rejects_negative_spacing() {
    let cfg = FlowConfig::builder().spacing(-1.0, 4.0).build();
    match cfg.validate() {
        Err(FlowError::InvalidSpacing {
            horizontal,
            vertical,
        }) => {
            assert_eq!(horizontal, -1.0);
            assert_eq!(vertical, 4.0);
        }
        other => panic!("Expected InvalidSpacing error, got {other:?}"),
    }
}

#[test]
fn test_validate_rejects_bad_max_width() {
    let cfg = FlowConfig::builder().with_max_width(-3.0).build();
    assert!(matches!(cfg.validate(), Err(FlowError::InvalidMaxWidth(_))));
    let cfg = FlowConfig::builder().with_max_width(f64::NAN).build();
    assert!(matches!(cfg.validate(), Err(FlowError::InvalidMaxWidth(_))));
    // zero is a valid "derive from content" request
    let cfg = FlowConfig::builder().with_max_width(0.0).build();
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_validate_items_reports_index() {
    let items = vec![Item::new("ok", 1.0, 1.0), Item::new("bad", 2.0, -1.0)];
    match validate_items(&items) {
        Err(FlowError::InvalidItem { index, reason }) => {
            assert_eq!(index, 1);
            assert!(reason.contains("negative"));
        }
        other => panic!("Expected InvalidItem error, got {other:?}"),
    }
    let items = vec![Item::new("nan", f64::NAN, 1.0)];
    assert!(matches!(
        validate_items(&items),
        Err(FlowError::InvalidItem { index: 0, .. })
    ));
}

#[test]
fn test_placed_in_translates_frames() {
    let cfg = FlowConfig::builder().with_max_width(50.0).spacing(0.0, 0.0).build();
    let out = pack_layout(vec![("a", 30.0, 10.0), ("b", 30.0, 10.0)], &cfg);
    let size = out.size;
    let placed = out.placed_in(Point::new(100.0, 20.0));
    assert_eq!(placed.frames[0].frame.origin(), Point::new(100.0, 20.0));
    assert_eq!(placed.frames[1].frame.origin(), Point::new(100.0, 30.0));
    assert_eq!(placed.lines[1].y, 30.0);
    assert_eq!(placed.size, size);
}

#[test]
fn test_placed_in_keeps_alignment_offset() {
    let cfg = FlowConfig::builder()
        .with_max_width(100.0)
        .spacing(0.0, 0.0)
        .align_horizontal(HorizontalAlignment::End)
        .build();
    let out = pack_layout(vec![("a", 40.0, 10.0)], &cfg);
    assert_eq!(out.lines[0].offset, 60.0);
    let placed = out.placed_in(Point::new(-5.0, 40.0));
    assert_eq!(placed.lines[0].offset, 60.0);
    assert_eq!(placed.lines[0].y, 40.0);
    assert_eq!(placed.frames[0].frame.x, 55.0);
}
