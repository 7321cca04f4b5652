//! Pyramid Planning Tests
//!
//! Tests for:
//! - Halving sequence and dimension floor
//! - Early termination on small targets
//! - Level count bounds across a grid of target sizes

use myth_pixelation::pyramid::{BufferPyramidPlanner, MIN_LEVEL_DIMENSION, PyramidPlan, Resolution};

fn res(width: u32, height: u32) -> Resolution {
    Resolution::new(width, height)
}

// ============================================================================
// Fixed Cases
// ============================================================================

#[test]
fn zero_max_levels_is_always_empty() {
    for (w, h) in [(1, 1), (2, 2), (3, 3), (1920, 1080), (4096, 16)] {
        assert!(
            BufferPyramidPlanner::plan(w, h, 0).is_empty(),
            "plan({w}, {h}, 0) should be empty"
        );
    }
}

#[test]
fn three_by_three_yields_no_levels() {
    assert!(BufferPyramidPlanner::plan(3, 3, 5).is_empty());
}

#[test]
fn full_hd_three_levels() {
    assert_eq!(
        BufferPyramidPlanner::plan(1920, 1080, 3),
        vec![res(960, 540), res(480, 270), res(240, 135)]
    );
}

#[test]
fn full_hd_is_not_truncated_early() {
    // Five halvings still stay above the floor: 60×33 is the fifth level.
    let plan = PyramidPlan::new(1920, 1080, 5);
    assert_eq!(plan.real_level_count(), 5);
    assert_eq!(plan.coarsest(), res(60, 33));
}

#[test]
fn square_256_three_levels() {
    assert_eq!(
        BufferPyramidPlanner::plan(256, 256, 3),
        vec![res(128, 128), res(64, 64), res(32, 32)]
    );
}

#[test]
fn thin_target_stops_on_narrow_dimension() {
    // 1024×6 → 512×3 → (256×1 rejected)
    let plan = PyramidPlan::new(1024, 6, 5);
    assert_eq!(plan.levels(), &[res(512, 3)]);
}

#[test]
fn four_by_four_gives_single_two_by_two_level() {
    assert_eq!(BufferPyramidPlanner::plan(4, 4, 5), vec![res(2, 2)]);
}

#[test]
fn empty_plan_reports_base_as_coarsest() {
    let plan = PyramidPlan::new(3, 3, 5);
    assert_eq!(plan.real_level_count(), 0);
    assert_eq!(plan.coarsest(), res(3, 3));
    assert_eq!(plan.base(), res(3, 3));
}

// ============================================================================
// Properties over a size grid
// ============================================================================

#[test]
fn plan_properties_hold_over_grid() {
    let sizes = [2, 3, 4, 5, 7, 8, 15, 16, 17, 63, 64, 100, 255, 256, 720, 1080, 1920];

    for &w in &sizes {
        for &h in &sizes {
            for max in 0..=6u32 {
                let plan = PyramidPlan::new(w, h, max);
                let levels = plan.levels();

                assert!(
                    levels.len() <= max as usize,
                    "plan({w}, {h}, {max}) produced {} levels",
                    levels.len()
                );

                let mut previous = res(w, h);
                for level in levels {
                    assert_eq!(*level, previous.halved(), "plan({w}, {h}, {max})");
                    assert!(level.width >= MIN_LEVEL_DIMENSION);
                    assert!(level.height >= MIN_LEVEL_DIMENSION);
                    previous = *level;
                }

                if levels.len() < max as usize {
                    let next = previous.halved();
                    assert!(
                        next.width < MIN_LEVEL_DIMENSION || next.height < MIN_LEVEL_DIMENSION,
                        "plan({w}, {h}, {max}) stopped early at {previous:?}"
                    );
                }
            }
        }
    }
}
