use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use datemark_core::{FileReport, ProcessOptions, ProcessResult, StyleConfig};

#[derive(Parser)]
#[command(name = "datemark", version, about = "Stamp photos with the date they were taken")]
struct Cli {
    /// Directory containing the photos
    path: PathBuf,

    /// Watermark font size in pixels [default: 50]
    #[arg(long, alias = "font_size")]
    font_size: Option<u32>,

    /// Watermark color, e.g. 'white', '#FF0000', 'rgba(255, 255, 255, 180)' [default: rgba(255, 255, 255, 180)]
    #[arg(long)]
    color: Option<String>,

    /// Watermark position: top-left, top-right, bottom-left, bottom-right or center [default: bottom-right]
    #[arg(long)]
    position: Option<String>,

    /// TrueType/OpenType font file (falls back to a built-in font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// JSON file with default style settings (flags take precedence)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Process files in parallel
    #[arg(long)]
    parallel: bool,

    /// Verbose diagnostics
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn style(&self) -> anyhow::Result<StyleConfig> {
        let mut style = match &self.config {
            Some(path) => StyleConfig::from_json_file(path)?,
            None => StyleConfig::default(),
        };
        if let Some(size) = self.font_size {
            style.font_size = size;
        }
        if let Some(color) = &self.color {
            style.color = color.clone();
        }
        if let Some(position) = &self.position {
            style.position = position.clone();
        }
        if self.font.is_some() {
            style.font = self.font.clone();
        }
        style.parallel |= self.parallel;
        Ok(style)
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<ProcessResult> {
    let options = ProcessOptions {
        source_dir: cli.path.clone(),
        style: cli.style()?,
    };
    tracing::debug!("options: {:?}", options);

    datemark_core::process(&options, &|report: &FileReport| {
        println!("{}", report);
    })
    .with_context(|| format!("cannot watermark '{}'", cli.path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let t_total = std::time::Instant::now();

    let result = run(&cli)?;

    println!(
        "\nDone! {} image(s): {} watermarked, {} skipped, {} failed -> {} ({:.2}s)",
        result.total,
        result.written,
        result.skipped,
        result.failed,
        result.output_dir.display(),
        t_total.elapsed().as_secs_f64()
    );

    Ok(())
}
