use flow_packer_core::prelude::*;
use rand::{Rng, SeedableRng};

fn random_items(seed: u64, n: usize) -> Vec<Item> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let w = rng.gen_range(0.0..180.0);
            let h = rng.gen_range(4.0..48.0);
            Item::new(format!("item_{}", i), w, h)
        })
        .collect()
}

fn alignments() -> Vec<LineAlignment> {
    use HorizontalAlignment as H;
    use VerticalAlignment as V;
    let mut v = Vec::new();
    for h in [H::Start, H::Center, H::End] {
        for vv in [V::Start, V::Center, V::End] {
            v.push(LineAlignment::new(h, vv));
        }
    }
    v
}

fn check_invariants(items: &[Item], out: &PackResult, max_width: f64) {
    // one frame per item, input order
    assert_eq!(out.frames.len(), items.len());
    for (it, fr) in items.iter().zip(&out.frames) {
        assert_eq!(it.key, fr.key);
        assert!(fr.frame.w <= max_width);
    }
    // lines tile the frames in order, none empty
    let mut next = 0;
    for (li, line) in out.lines.iter().enumerate() {
        assert_eq!(line.start, next);
        assert!(!line.is_empty());
        next = line.end;
        let frames = out.line_frames(line);
        for f in frames {
            assert_eq!(f.line, li);
            // fits in the line, or is alone on it
            assert!(
                f.frame.max_x() <= max_width + 1e-9 || frames.len() == 1,
                "frame {:?} exceeds {}",
                f.frame,
                max_width
            );
            assert!(f.frame.y >= line.y && f.frame.max_y() <= line.y + line.height + 1e-9);
        }
        for pair in frames.windows(2) {
            assert!(pair[0].frame.max_x() <= pair[1].frame.x + 1e-9);
        }
    }
    assert_eq!(next, out.frames.len());
    // lines stack downwards without overlapping
    for pair in out.lines.windows(2) {
        assert!(pair[0].y + pair[0].height <= pair[1].y);
    }
    // bounding size covers every frame
    for f in &out.frames {
        assert!(f.frame.max_x() <= out.size.w);
        assert!(f.frame.max_y() <= out.size.h);
    }
}

#[test]
fn random_layouts_hold_invariants() {
    for seed in 0..8u64 {
        let items = random_items(seed, 150);
        for alignment in alignments() {
            for max_width in [60.0, 200.0, 375.0, 1024.0] {
                let cfg = FlowConfig::builder()
                    .with_max_width(max_width)
                    .spacing(6.0, 4.0)
                    .line_alignment(alignment)
                    .build();
                let out = pack(&items, &cfg);
                check_invariants(&items, &out, max_width);
            }
        }
    }
}

#[test]
fn content_width_never_clamps() {
    let items = random_items(7, 90);
    let out = pack(&items, &FlowConfig::default());
    let widest = items.iter().fold(0.0_f64, |m, it| m.max(it.size.w));
    assert_eq!(out.max_width, widest);
    assert!(out.frames.iter().all(|f| !f.clamped && f.frame.w == f.natural.w));
    check_invariants(&items, &out, widest);
}

#[test]
fn repeated_packing_is_identical() {
    let items = random_items(42, 200);
    let cfg = FlowConfig::builder()
        .with_max_width(333.0)
        .spacing(7.5, 3.25)
        .line_alignment(LineAlignment::CENTER)
        .build();
    let a = pack(&items, &cfg);
    let b = pack(&items, &cfg);
    assert_eq!(a, b);
    for (fa, fb) in a.frames.iter().zip(&b.frames) {
        assert_eq!(fa.frame.x.to_bits(), fb.frame.x.to_bits());
        assert_eq!(fa.frame.y.to_bits(), fb.frame.y.to_bits());
    }
}

#[test]
fn width_sweep_matches_individual_packs() {
    let items = random_items(3, 60);
    let cfg = FlowConfig::builder().spacing(4.0, 4.0).parallel(true).build();
    let widths = [500.0, 120.0, 260.0];
    let swept = pack_widths(&items, &cfg, &widths);
    assert_eq!(swept.len(), widths.len());
    for ((w, out), expected_w) in swept.iter().zip(widths) {
        assert_eq!(*w, expected_w);
        let single = pack(&items, &FlowConfig { max_width: Some(*w), ..cfg.clone() });
        assert_eq!(out, &single);
    }
    // wider lines never need more lines
    assert!(swept[0].1.lines.len() <= swept[2].1.lines.len());
    assert!(swept[2].1.lines.len() <= swept[1].1.lines.len());
}

#[test]
fn narrowest_width_respects_line_budget() {
    let items: Vec<Item> = (0..6).map(|i| Item::new(format!("t{}", i), 40.0, 10.0)).collect();
    let cfg = FlowConfig::builder().spacing(0.0, 0.0).build();
    let widths = [80.0, 120.0, 240.0, 160.0];
    // 2 lines of 3 items need 120
    let w = flow_packer_core::narrowest_width_within(&items, &cfg, &widths, 2);
    assert_eq!(w, Some(120.0));
    assert_eq!(
        flow_packer_core::narrowest_width_within(&items, &cfg, &[40.0], 2),
        None
    );
}
