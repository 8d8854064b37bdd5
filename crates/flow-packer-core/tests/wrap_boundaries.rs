use flow_packer_core::prelude::*;

fn cfg(max_width: f64, gap_x: f64) -> FlowConfig {
    FlowConfig::builder()
        .with_max_width(max_width)
        .spacing(gap_x, 0.0)
        .build()
}

fn xs(out: &PackResult) -> Vec<f64> {
    out.frames.iter().map(|f| f.frame.x).collect()
}

fn line_of(out: &PackResult) -> Vec<usize> {
    out.frames.iter().map(|f| f.line).collect()
}

#[test]
fn wraps_when_next_item_crosses_width() {
    // 0 + 50 fits; 60 + 60 = 120 > 100 wraps; 70 + 50 = 120 > 100 wraps again
    let items = vec![("a", 50.0, 10.0), ("b", 60.0, 10.0), ("c", 50.0, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 10.0));
    assert_eq!(out.lines.len(), 3);
    assert_eq!(xs(&out), vec![0.0, 0.0, 0.0]);
    assert_eq!(line_of(&out), vec![0, 1, 2]);
}

#[test]
fn two_items_share_a_line_when_they_fit() {
    let items = vec![("a", 40.0, 10.0), ("b", 50.0, 10.0), ("c", 30.0, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 10.0));
    // 50 + 50 = 100 fits exactly; 110 + 30 > 100
    assert_eq!(line_of(&out), vec![0, 0, 1]);
    assert_eq!(xs(&out), vec![0.0, 50.0, 0.0]);
}

#[test]
fn exact_fit_does_not_wrap() {
    let items = vec![("a", 60.0, 10.0), ("b", 40.0, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 0.0));
    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.frames[1].frame.max_x(), 100.0);

    let items = vec![("a", 60.0, 10.0), ("b", 40.5, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 0.0));
    assert_eq!(out.lines.len(), 2);
}

#[test]
fn spacing_counts_toward_the_limit() {
    let items = vec![("a", 45.0, 10.0), ("b", 45.0, 10.0)];
    assert_eq!(pack_layout(items.clone(), &cfg(100.0, 10.0)).lines.len(), 1);
    assert_eq!(pack_layout(items, &cfg(100.0, 11.0)).lines.len(), 2);
}

#[test]
fn oversized_item_is_clamped_on_its_own_line() {
    let items = vec![("small", 30.0, 10.0), ("huge", 250.0, 40.0), ("tail", 30.0, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 8.0));
    assert_eq!(line_of(&out), vec![0, 1, 2]);
    let huge = &out.frames[1];
    assert!(huge.clamped);
    assert_eq!(huge.frame.w, 100.0);
    assert_eq!(huge.frame.h, 40.0);
    assert_eq!(huge.natural, Size::new(250.0, 40.0));
    assert!(!out.frames[0].clamped);
    assert_eq!(out.size.w, 100.0);
}

#[test]
fn first_item_never_wraps_into_an_empty_line() {
    let items = vec![("huge", 500.0, 10.0)];
    let out = pack_layout(items, &cfg(100.0, 8.0));
    assert_eq!(out.lines.len(), 1);
    assert_eq!(out.frames[0].frame.y, 0.0);
    assert!(out.lines.iter().all(|l| !l.is_empty()));
}

#[test]
fn content_width_is_used_when_unset_or_zero() {
    let items = vec![("a", 30.0, 10.0), ("b", 80.0, 10.0), ("c", 40.0, 10.0), ("d", 35.0, 10.0)];
    for cfg in [
        FlowConfig::builder().fit_content().spacing(5.0, 5.0).build(),
        FlowConfig::builder().with_max_width(0.0).spacing(5.0, 5.0).build(),
    ] {
        let out = pack_layout(items.clone(), &cfg);
        assert_eq!(out.max_width, 80.0);
        assert!(out.frames.iter().all(|f| !f.clamped));
        // a | b | c d (40 + 5 + 35 = 80 fits)
        assert_eq!(line_of(&out), vec![0, 1, 2, 2]);
        assert_eq!(out.size, Size::new(80.0, 40.0));
    }
}

#[test]
fn vertical_spacing_stacks_lines_by_tallest_item() {
    let cfg = FlowConfig::builder()
        .with_max_width(50.0)
        .spacing(0.0, 4.0)
        .build();
    let out = pack_layout(
        vec![("a", 25.0, 10.0), ("b", 25.0, 30.0), ("c", 50.0, 12.0)],
        &cfg,
    );
    assert_eq!(out.lines[0].height, 30.0);
    assert_eq!(out.lines[1].y, 34.0);
    assert_eq!(out.frames[2].frame.y, 34.0);
    assert_eq!(out.size.h, 46.0);
}
