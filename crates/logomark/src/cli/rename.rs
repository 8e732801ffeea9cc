//! The `logomark rename` command.

use clap::{Args, ValueEnum};
use console::style;
use logomark_core::pipeline::FileRecord;
use logomark_core::{
    BatchReport, Config, DiscoveredFile, ProviderFactory, ProviderKind, RenameDecision,
    RenameOptions, Renamer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::collect_inputs;

/// Model backends selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Gemini API (needs GEMINI_API_KEY)
    Hosted,
    /// OpenAI-compatible server such as LM Studio (needs a model name)
    Local,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Hosted => ProviderKind::Hosted,
            ProviderArg::Local => ProviderKind::Local,
        }
    }
}

/// Arguments for the `rename` command.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Show what would be renamed without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Model backend (defaults to provider.default from config)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name, overriding config and environment
    #[arg(long)]
    pub model: Option<String>,

    /// Move renamed files into this directory
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Process at most this many images in total
    #[arg(short = 'n', long)]
    pub max_images: Option<usize>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Execute the rename command.
pub async fn execute(args: RenameArgs, config: &Config) -> anyhow::Result<()> {
    let files = collect_inputs(&args.inputs, config)?;
    if files.is_empty() {
        tracing::warn!("No supported image files to rename");
        return Ok(());
    }

    let provider_config = config.provider_config(args.provider.map(Into::into), args.model.as_deref())?;
    let provider = ProviderFactory::create(&provider_config)?;
    tracing::info!("Using {} provider with model {}", provider.name(), provider.model());

    let options = RenameOptions {
        dry_run: args.dry_run,
        output_dir: args
            .output_dir
            .as_deref()
            .map(|dir| PathBuf::from(shellexpand::tilde(dir).into_owned())),
        request_interval: Duration::from_millis(config.processing.request_interval_ms),
        max_files: args.max_images,
    };
    let mut renamer = Renamer::new(Arc::from(provider), config.limits.clone(), options);

    rename_files(&mut renamer, &files, &args).await
}

async fn rename_files(renamer: &mut Renamer, files: &[DiscoveredFile], args: &RenameArgs) -> anyhow::Result<()> {
    let total = args.max_images.unwrap_or(files.len()).min(files.len());
    tracing::info!("Found {} image(s), processing {}", files.len(), total);

    // A single file gets its report line without bar or summary.
    let batch = total > 1;
    let progress = if batch {
        create_progress_bar(total as u64)
    } else {
        indicatif::ProgressBar::hidden()
    };
    let json = args.json;
    let report = renamer
        .rename_batch(files, |file| {
            progress.inc(1);
            progress.set_message(file_name(&file.path));
            if !json {
                let line = match &file.result {
                    Ok(decision) => describe(decision),
                    Err(e) => format!("{} {}", style("failed").red().bold(), e),
                };
                progress.suspend(|| println!("{line}"));
            }
        })
        .await;
    progress.finish_and_clear();

    if json {
        let records: Vec<FileRecord> = report.records();
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    if batch {
        print_summary(&report, args.dry_run);
    }

    if !report.is_success() {
        anyhow::bail!("{} of {} file(s) failed", report.failed(), report.files.len());
    }
    Ok(())
}

/// One report line for a decision.
fn describe(decision: &RenameDecision) -> String {
    let (label, arrow_target) = if decision.is_unchanged() {
        (style("unchanged").dim(), None)
    } else if decision.applied {
        (style("renamed").green().bold(), Some(&decision.target))
    } else {
        (style("would rename").yellow().bold(), Some(&decision.target))
    };

    let confidence = if decision.brand.is_confident {
        String::new()
    } else {
        format!(" {}", style("(no brand recognized)").dim())
    };

    match arrow_target {
        Some(target) => format!(
            "{label} {} -> {}{confidence}",
            file_name(&decision.source),
            display_target(&decision.source, target)
        ),
        None => format!("{label} {}{confidence}", file_name(&decision.source)),
    }
}

/// Bare file name when the target stays beside the source, full path otherwise.
fn display_target(source: &Path, target: &Path) -> String {
    if source.parent() == target.parent() {
        file_name(target)
    } else {
        target.display().to_string()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Create a progress bar for directory runs.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(bar_style.progress_chars("##-"));
    }
    pb.set_message("starting...");
    pb
}

/// Print a summary table after a directory run.
fn print_summary(report: &BatchReport, dry_run: bool) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    if dry_run {
        eprintln!("    Would rename: {:>8}", report.previewed());
    } else {
        eprintln!("    Renamed:      {:>8}", report.renamed());
    }
    if report.unchanged() > 0 {
        eprintln!("    Unchanged:    {:>8}", report.unchanged());
    }
    if report.failed() > 0 {
        eprintln!("    Failed:       {:>8}", style(report.failed()).red());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", report.files.len());
    eprintln!("    Duration:     {:>7.1}s", report.elapsed.as_secs_f64());
    eprintln!("  ====================================");
}
