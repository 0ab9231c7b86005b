use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{DrawCommand, Layout, LineSegment, PersonBlock};
use crate::theme::Theme;
use crate::view::ViewTransform;
use anyhow::Result;
use std::path::Path;

/// Replays the layout onto a viewport-sized surface with the pan/zoom
/// transform applied to the whole drawing.
pub fn render_svg(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    render: &RenderConfig,
    view: &ViewTransform,
) -> String {
    let transform = (!view.is_identity()).then(|| view.to_svg_transform());
    surface_svg(
        layout,
        theme,
        config,
        &render.background,
        render.width.max(1.0),
        render.height.max(1.0),
        transform.as_deref(),
    )
}

/// Standalone document for download: no view transform, sized to the
/// drawing's natural extent.
pub fn export_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    surface_svg(
        layout,
        theme,
        config,
        &theme.background,
        layout.width.max(1.0),
        layout.height.max(1.0),
        None,
    )
}

fn surface_svg(
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
    background: &str,
    width: f32,
    height: f32,
    transform: Option<&str>,
) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str("<defs><style type=\"text/css\">");
    svg.push_str(&escape_xml_text(&theme.stylesheet(config.line_thickness)));
    svg.push_str("</style></defs>");
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(background)
    ));

    if let Some(transform) = transform {
        svg.push_str(&format!("<g transform=\"{transform}\">"));
    }
    for command in &layout.commands {
        match command {
            DrawCommand::Person(block) => svg.push_str(&person_svg(block)),
            DrawCommand::Junction(junction) => svg.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" class=\"shape-outline\"/>",
                junction.x, junction.y, junction.r
            )),
            DrawCommand::Line(line) => svg.push_str(&line_svg(line)),
            DrawCommand::CornerLine(corner) => {
                for segment in corner.segments() {
                    svg.push_str(&line_svg(&segment));
                }
            }
        }
    }
    if transform.is_some() {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn person_svg(block: &PersonBlock) -> String {
    let mut text = format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" class=\"person-text\" data-person-id=\"{}\">",
        block.x, block.y, block.id
    );
    text.push_str(&format!(
        "<tspan class=\"person-name\">{}</tspan>",
        escape_xml(&block.label.name)
    ));
    if let Some(years) = &block.label.years {
        text.push_str(&format!(
            "<tspan class=\"person-years\">{}</tspan>",
            escape_xml(years)
        ));
    }
    text.push_str("</text>");
    text
}

fn line_svg(line: &LineSegment) -> String {
    format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" class=\"connection-line\"/>",
        line.x1, line.y1, line.x2, line.y2
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
            log::info!(path:? = path; "SVG written");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Arial".to_string());
    opt.fontdb_mut().load_system_fonts();
    let default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .or_else(|| usvg::Size::from_wh(800.0, 600.0))
        .ok_or_else(|| anyhow::anyhow!("Invalid render size"))?;
    opt.default_size = default_size;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    log::info!(path:? = output; "PNG written");
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn escape_xml_text(input: &str) -> String {
    input.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Dataset, PersonRecord};
    use crate::layout::{FixedMetrics, compute_layout};

    fn family_layout() -> Layout {
        let mut a = PersonRecord::new(1, "Milan & Co");
        a.pids = vec![2];
        a.born = Some("1901".to_string());
        let b = PersonRecord::new(2, "Jelena");
        let mut c = PersonRecord::new(3, "Petar");
        c.fid = Some(1);
        c.mid = Some(2);
        let dataset = Dataset::new(1, vec![a, b, c]);
        compute_layout(
            &dataset,
            &FixedMetrics::default(),
            &Theme::classic(),
            &LayoutConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn render_svg_basic() {
        let layout = family_layout();
        let svg = render_svg(
            &layout,
            &Theme::classic(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
            &ViewTransform::default(),
        );
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"1200.00\""));
        assert!(svg.contains("data-person-id=\"3\""));
        assert!(svg.contains("<tspan class=\"person-name\">Milan &amp; Co</tspan>"));
        assert!(svg.contains("<tspan class=\"person-years\"> 1901</tspan>"));
        assert!(!svg.contains("<g transform"));
    }

    #[test]
    fn corner_lines_become_two_segments() {
        let layout = family_layout();
        let svg = export_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        // One couple line plus the two halves of one corner connector.
        assert_eq!(svg.matches("<line ").count(), 3);
        assert_eq!(svg.matches("<circle ").count(), 1);
        assert_eq!(svg.matches("<text ").count(), 3);
    }

    #[test]
    fn name_only_person_has_single_run() {
        let layout = family_layout();
        let svg = export_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert!(svg.contains("<tspan class=\"person-name\">Petar</tspan></text>"));
    }

    #[test]
    fn view_transform_wraps_drawing_but_not_export() {
        let layout = family_layout();
        let mut view = ViewTransform::default();
        view.pan(10.0, 5.0);
        let live = render_svg(
            &layout,
            &Theme::classic(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
            &view,
        );
        assert!(live.contains("<g transform=\"translate(10.00 5.00) scale(1.0000)\">"));

        let exported = export_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert!(!exported.contains("transform"));
        assert!(exported.contains(&format!("width=\"{:.2}\"", layout.width)));
        assert!(exported.contains(&format!("viewBox=\"0 0 {:.2} {:.2}\"", layout.width, layout.height)));
    }

    #[test]
    fn stylesheet_is_embedded() {
        let layout = family_layout();
        let svg = export_svg(&layout, &Theme::classic(), &LayoutConfig::default());
        assert!(svg.contains("<style type=\"text/css\">"));
        assert!(svg.contains(".connection-line { stroke: black; stroke-width: 0.8;"));
    }
}
