#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod details;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod relations;
pub mod render;
pub mod text_metrics;
pub mod theme;
pub mod view;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use ir::{Dataset, Gender, PersonId, PersonRecord, load_dataset, parse_dataset};
pub use layout::{Layout, LayoutError, compute_layout};
pub use render::{export_svg, render_svg};
pub use theme::Theme;
pub use view::ViewTransform;

/// Theme and layout settings for one-shot rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self {
            theme: Theme::classic(),
            layout: LayoutConfig::default(),
        }
    }

    pub fn modern() -> Self {
        Self {
            theme: Theme::modern(),
            layout: LayoutConfig::default(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::classic()
    }
}

/// Parses a JSON dataset, lays it out and returns the exported SVG document.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let dataset = parse_dataset(input)?;
    let metrics = layout::metrics_for(&options.layout);
    let layout = compute_layout(&dataset, metrics.as_ref(), &options.theme, &options.layout)?;
    Ok(export_svg(&layout, &options.theme, &options.layout))
}
