use std::path::Path;

use family_tree_renderer::layout::{FixedMetrics, Layout};
use family_tree_renderer::{
    Dataset, LayoutConfig, LayoutError, Theme, compute_layout, export_svg, load_dataset,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn fixture_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> Dataset {
    load_dataset(&fixture_path(name)).expect("fixture read failed")
}

fn layout_fixture(dataset: &Dataset) -> Result<Layout, LayoutError> {
    compute_layout(
        dataset,
        &FixedMetrics::new(10.0, 20.0),
        &Theme::classic(),
        &LayoutConfig::default(),
    )
}

fn person_ids(layout: &Layout) -> Vec<i64> {
    layout.persons().map(|block| block.id).collect()
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "couple.json",
        "generations.json",
        "single_parent.json",
        "dangling.json",
    ];

    for rel in candidates {
        let path = fixture_path(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let dataset = load_fixture(rel);
        let layout = layout_fixture(&dataset).unwrap_or_else(|err| panic!("{rel}: {err}"));
        let svg = export_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert_valid_svg(&svg, rel);
    }
}

#[test]
fn generations_draw_every_reachable_person_once() {
    let dataset = load_fixture("generations.json");
    let layout = layout_fixture(&dataset).unwrap();
    assert_eq!(person_ids(&layout), vec![1, 2, 3, 4, 6, 7, 8, 9, 5]);
    // One junction per family that has children.
    assert_eq!(layout.junctions().count(), 3);
    assert_eq!(layout.corner_lines().count(), 5);
    assert_eq!(layout.lines().count(), 3);
}

#[test]
fn generations_grow_rightwards_and_downwards() {
    let dataset = load_fixture("generations.json");
    let layout = layout_fixture(&dataset).unwrap();
    let x_of = |id| layout.person_block(id).unwrap().x;
    let y_of = |id| layout.person_block(id).unwrap().y;
    assert!(x_of(3) > x_of(1));
    assert!(x_of(7) > x_of(3));
    assert!(x_of(9) > x_of(7));
    // Siblings share a column, later ones below.
    assert_eq!(x_of(3), x_of(5));
    assert!(y_of(5) > y_of(9));
    for block in layout.persons() {
        assert!(block.x + block.width <= layout.width);
        assert!(block.y + block.height <= layout.height);
    }
}

#[test]
fn corner_lines_start_at_their_junction() {
    let dataset = load_fixture("generations.json");
    let layout = layout_fixture(&dataset).unwrap();
    for corner in layout.corner_lines() {
        assert!(
            layout
                .junctions()
                .any(|j| j.x == corner.x1 && j.y == corner.y1),
            "corner line without junction at ({}, {})",
            corner.x1,
            corner.y1
        );
    }
}

#[test]
fn single_parent_children_follow_id_order() {
    let dataset = load_fixture("single_parent.json");
    let layout = layout_fixture(&dataset).unwrap();
    assert_eq!(person_ids(&layout), vec![10, 11, 12]);
    assert_eq!(layout.lines().count(), 0);
    assert_eq!(layout.junctions().count(), 1);
}

#[test]
fn dangling_references_are_skipped() {
    let dataset = load_fixture("dangling.json");
    let layout = layout_fixture(&dataset).unwrap();
    assert_eq!(person_ids(&layout), vec![1, 3]);
}

#[test]
fn missing_root_is_an_error() {
    let dataset = load_fixture("missing_root.json");
    assert_eq!(
        layout_fixture(&dataset).unwrap_err(),
        LayoutError::MissingRoot(42)
    );
}
