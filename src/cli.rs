use crate::config::load_config;
use crate::details::PersonDetails;
use crate::ir::{Dataset, PersonId, parse_dataset};
use crate::layout::{compute_layout, metrics_for};
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::render::{export_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "ftree", version, about = "Family tree layout and SVG renderer")]
pub struct Args {
    /// Input dataset (.json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Viewport width used for PNG rasterization
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Viewport height used for PNG rasterization
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Estimate text widths from a character table instead of system fonts
    #[arg(long = "fast-text")]
    pub fast_text: bool,

    /// Print the details of one person instead of rendering
    #[arg(long = "person")]
    pub person: Option<PersonId>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");
    run_with_args(&args)
}

fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .try_init();
}

pub fn run_with_args(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if args.fast_text {
        config.layout.fast_text_metrics = true;
    }

    let dataset = read_dataset(args.input.as_deref())?;
    info!(root = dataset.root, nodes = dataset.nodes().len(); "Dataset loaded");

    if let Some(id) = args.person {
        return print_person(&dataset, id);
    }

    let metrics = metrics_for(&config.layout);
    let layout = compute_layout(&dataset, metrics.as_ref(), &config.theme, &config.layout)?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = export_svg(&layout, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_layout_dump(path, &layout, &dataset)?,
            None => println!("{}", layout_dump_json(&layout, &dataset)?),
        },
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&layout, &config, &output)?;
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
fn write_png(layout: &crate::layout::Layout, config: &crate::config::Config, output: &Path) -> Result<()> {
    // Rasterized at the viewport size, so `-w`/`-H` pick the image dimensions.
    let svg = crate::render::render_svg(
        layout,
        &config.theme,
        &config.layout,
        &config.render,
        &crate::view::ViewTransform::default(),
    );
    crate::render::write_output_png(&svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_layout: &crate::layout::Layout, _config: &crate::config::Config, _output: &Path) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the 'png' feature"))
}

fn print_person(dataset: &Dataset, id: PersonId) -> Result<()> {
    let details = PersonDetails::collect(dataset, id)
        .ok_or_else(|| anyhow::anyhow!("No person with id {id}"))?;
    print!("{details}");
    Ok(())
}

fn read_dataset(path: Option<&Path>) -> Result<Dataset> {
    let input = read_input(path)?;
    parse_dataset(&input)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
