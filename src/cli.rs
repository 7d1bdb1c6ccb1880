use crate::config::{Config, check_canvas_size, load_config};
use crate::layout::compute_label_layout;
use crate::layout_dump::{layout_dump_json, write_layout_dump};
use crate::parser::parse_point_cloud;
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::theme::Theme;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plabels", version, about = "Collision-free label layout for projected point clouds")]
pub struct Args {
    /// Input file (.json, .json5 or .tsv) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for SVG and JSON if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Theme name (projector, dark); overrides the config file
    #[arg(short = 't', long = "theme")]
    pub theme: Option<String>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Label every point, not only the selection
    #[arg(long = "labelAll")]
    pub label_all: bool,

    /// Try left, above and below when the right-hand spot is taken
    #[arg(long = "alternateAnchors")]
    pub alternate_anchors: bool,

    /// Also write the JSON layout dump to this file
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log every layout pass
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let input = read_input(args.input.as_deref())?;
    let cloud = parse_point_cloud(&input)?;
    let layout = compute_label_layout(&cloud, &config.theme, &config.layout);
    tracing::info!(
        placed = layout.placed.len(),
        rejected = layout.rejected.len(),
        "laid out labels"
    );

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.layout);
            write_output_png(&svg, &output, &config.render, &config.theme)?;
        }
        OutputFormat::Json => {
            let json = layout_dump_json(&layout)?;
            match args.output.as_deref() {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(name) = args.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("Unknown theme '{name}'"))?;
        config.render.background = config.theme.background.clone();
    }
    let width = args.width.unwrap_or(config.layout.canvas_width);
    let height = args.height.unwrap_or(config.layout.canvas_height);
    check_canvas_size(width, height)?;
    config.set_canvas_size(width, height);
    if args.label_all {
        config.layout.label_all_points = true;
    }
    if args.alternate_anchors {
        config.layout.alternate_anchors = true;
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}
