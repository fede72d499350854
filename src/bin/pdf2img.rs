//! CLI binary for pdf2img.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `RenderRequest`, runs the conversion, and exports the rendered pages.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2img::{
    density, export_all, inspect, ConversionProgressCallback, Converter, OutputFormat,
    OverwriteConfirm, PdfiumEngine, ProgressCallback, RenderRequest, RunOutcome,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress: one bar that tracks rendering, then retargets itself
/// for the export phase.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose bar length is set dynamically by
    /// `on_conversion_start` (the page count is unknown until the PDF is
    /// opened).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, prefix: &'static str, total: usize, unit: &'static str) {
        // The same bar is reused for the export phase after the render phase
        // finished it; reset clears the finished state and the ETA history.
        self.bar.reset();
        let progress_style = ProgressStyle::with_template(&format!(
            "{{spinner:.cyan}} {{prefix:.bold}}  \
             [{{bar:42.green/238}}] {{pos:>3}}/{{len}} {unit}  \
             ⏱ {{elapsed_precise}}  ETA {{eta_precise}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(prefix);
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar("Converting", total_pages, "pages");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rendering {total_pages} pages…"))
        ));
    }

    fn on_page_rendered(&self, completed: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {completed}"));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }

    fn on_export_start(&self, total_files: usize) {
        self.activate_bar("Exporting", total_files, "files");
    }

    fn on_file_written(&self, completed: usize, _total_files: usize) {
        self.bar.set_message(format!("file {completed}"));
        self.bar.inc(1);
    }

    fn on_export_complete(&self, written: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} files written",
            green("✔"),
            bold(&written.to_string())
        );
    }
}

// ── Overwrite confirmation ───────────────────────────────────────────────────

/// Interactive overwrite prompt on stderr; `--yes` short-circuits it.
struct StdinConfirm {
    assume_yes: bool,
}

impl OverwriteConfirm for StdinConfirm {
    fn confirm_overwrite(&self, existing: &[PathBuf]) -> bool {
        if self.assume_yes {
            return true;
        }

        eprintln!(
            "{} {} file(s) already exist in the destination:",
            cyan("⚠"),
            existing.len()
        );
        for path in existing.iter().take(5) {
            eprintln!("    {}", path.display());
        }
        if existing.len() > 5 {
            eprintln!("    … and {} more", existing.len() - 5);
        }
        eprint!("Overwrite? [y/N] ");
        let _ = io::stderr().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() {
            return false;
        }
        matches!(line.trim(), "y" | "Y" | "yes" | "YES")
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render every page of a PDF to PNG files in the current directory
  pdf2img document.pdf

  # 300 DPI JPEGs into a chosen directory
  pdf2img --dpi 300 --format jpeg -o scans/ document.pdf

  # Custom base name: writes "page (1).png", "page (2).png", …
  pdf2img --base-name page document.pdf

  # Overwrite existing output without asking
  pdf2img -y document.pdf

  # Page count and metadata only, no rendering
  pdf2img --inspect-only document.pdf

COMMON RESOLUTIONS:
  72    screen preview
  96    1:1 with the page's layout units (default)
  150   comfortable reading quality
  300   print quality
  600   archival / zoomable detail

  Any value from 10 to 2000 is accepted.

OUTPUT NAMING:
  Files are written as "{base} (N){ext}" with N being the 1-based page
  number, e.g. "report (1).png" … "report (12).png". Existing files are
  never overwritten without confirmation.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Directory containing libpdfium — skips system lookup
"#;

/// Convert PDF documents to numbered per-page PNG or JPEG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Convert PDF documents to numbered per-page PNG or JPEG images",
    long_about = "Render each page of a PDF document to an image at a chosen resolution and \
export the pages as numbered files. Existing files are detected before anything is written \
and are only overwritten after confirmation.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF document to convert.
    input: PathBuf,

    /// Destination directory for the exported images.
    #[arg(short, long, env = "PDF2IMG_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Base name for exported files; defaults to the input file name
    /// without its extension.
    #[arg(long, env = "PDF2IMG_BASE_NAME")]
    base_name: Option<String>,

    /// Rendering resolution in DPI (10–2000).
    #[arg(long, env = "PDF2IMG_DPI", default_value = "96")]
    dpi: String,

    /// Output image format.
    #[arg(long, env = "PDF2IMG_FORMAT", value_enum, default_value = "png")]
    format: FormatArg,

    /// Overwrite existing files without asking.
    #[arg(short = 'y', long)]
    yes: bool,

    /// Render only; do not export any files.
    #[arg(long)]
    no_export: bool,

    /// Print page count and metadata only, no rendering.
    #[arg(long)]
    inspect_only: bool,

    /// Output run statistics as JSON on stdout.
    #[arg(long, env = "PDF2IMG_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2IMG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2IMG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2IMG_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Jpeg => OutputFormat::Jpeg,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active; the
    // bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let engine = Arc::new(PdfiumEngine::new().context("Failed to initialise the PDF engine")?);

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(engine, &cli.input)
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = info.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = info.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = info.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
            if let Some(ref p) = info.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = info.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build the request ────────────────────────────────────────────────
    // The density arrives as free text and must validate before anything
    // touches the document.
    let density_dpi = density::validate_text(&cli.dpi)
        .with_context(|| format!("Invalid --dpi value '{}'", cli.dpi))?;
    let format: OutputFormat = cli.format.clone().into();
    let request = RenderRequest::new(&cli.input, density_dpi, format);

    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    // ── Run conversion ───────────────────────────────────────────────────
    let converter = Converter::new(engine);
    let stats = match converter
        .run(request, progress.clone())
        .await
        .context("Conversion failed")?
    {
        RunOutcome::Completed { stats } => stats,
        // Nothing else runs in this process, so a supersession here would
        // mean a logic error rather than a newer request.
        RunOutcome::Superseded => anyhow::bail!("conversion was superseded unexpectedly"),
    };

    if !cli.quiet && !show_progress && !cli.json {
        eprintln!(
            "Rendered {} pages at {} DPI in {}ms",
            stats.rendered_pages, stats.density_dpi, stats.render_duration_ms
        );
    }

    // ── Export ───────────────────────────────────────────────────────────
    let report = if cli.no_export {
        None
    } else {
        let base_name = cli.base_name.clone().unwrap_or_else(|| {
            cli.input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "page".to_string())
        });

        tokio::fs::create_dir_all(&cli.output_dir)
            .await
            .with_context(|| {
                format!("Failed to create output directory {:?}", cli.output_dir)
            })?;

        let pages = converter.pages();
        let confirm = StdinConfirm {
            assume_yes: cli.yes,
        };
        let report = match export_all(
            &pages,
            &base_name,
            format,
            &cli.output_dir,
            &confirm,
            progress.clone(),
        )
        .await
        {
            Ok(report) => report,
            Err(pdf2img::Pdf2ImgError::ExportCancelled) => {
                if !cli.quiet {
                    eprintln!("{} export cancelled, no files written", red("✘"));
                }
                return Ok(());
            }
            Err(e) => return Err(e).context("Export failed"),
        };

        if !cli.quiet && !cli.json {
            eprintln!(
                "{}  {} files  →  {}",
                green("✔"),
                report.files.len(),
                bold(&cli.output_dir.display().to_string()),
            );
            eprintln!(
                "   {}",
                dim(&format!(
                    "render {}ms / export {}ms",
                    stats.render_duration_ms, report.export_duration_ms
                ))
            );
        }
        Some(report)
    };

    if cli.json {
        let summary = serde_json::json!({
            "stats": stats,
            "export": report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise output")?
        );
    }

    Ok(())
}
