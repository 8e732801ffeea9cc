//! The `logomark trim`, `logomark extend` and `logomark manipulate` commands.

use clap::Args;
use console::style;
use logomark_core::{parse_ops, Config, EditOutcome, ImageEditor, ImageOpError};
use std::path::{Path, PathBuf};

use super::collect_inputs;

/// Arguments for the `trim` command.
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Pixels of background to keep around the content
    #[arg(long, default_value = "10")]
    pub margin: u32,

    /// Overwrite the original instead of writing <name>_trimmed.<ext>
    #[arg(short, long)]
    pub replace: bool,
}

/// Arguments for the `extend` command.
#[derive(Args, Debug)]
pub struct ExtendArgs {
    /// Image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Overwrite the original instead of writing <name>_extended.<ext>
    #[arg(short, long)]
    pub replace: bool,
}

/// Arguments for the `manipulate` command.
#[derive(Args, Debug)]
pub struct ManipulateArgs {
    /// Comma-separated operations: `e` (extend), `t<margin>` (trim, default 20).
    /// Examples: `e`, `t20`, `e,t48`
    pub ops: String,

    /// Image files or directories of images
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Overwrite the original instead of writing <name>_processed.<ext>
    #[arg(short, long)]
    pub replace: bool,

    /// Skip writing when the result matches the source pixel for pixel (default)
    #[arg(long, overrides_with = "no_skip_same")]
    pub skip_same: bool,

    /// Write the result even when it matches the source
    #[arg(long, overrides_with = "skip_same")]
    pub no_skip_same: bool,
}

impl ManipulateArgs {
    /// Whether identical results are left unwritten.
    pub fn skips_same(&self) -> bool {
        !self.no_skip_same
    }
}

/// Per-file outcome counts of an edit command.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct EditTally {
    processed: usize,
    unchanged: usize,
    failed: usize,
}

impl EditTally {
    fn total(&self) -> usize {
        self.processed + self.unchanged + self.failed
    }

    /// Non-zero exit when any file failed.
    fn into_result(self) -> anyhow::Result<()> {
        if self.failed > 0 {
            anyhow::bail!("{} of {} file(s) failed", self.failed, self.total());
        }
        Ok(())
    }
}

/// Execute the trim command.
pub async fn execute_trim(args: TrimArgs, config: &Config) -> anyhow::Result<()> {
    let editor = &ImageEditor::new(config.limits.clone());
    let (margin, replace) = (args.margin, args.replace);
    run_each(&args.inputs, config, "Trimmed", move |path| async move {
        editor.trim_file(&path, margin, replace).await
    })
    .await?
    .into_result()
}

/// Execute the extend command.
pub async fn execute_extend(args: ExtendArgs, config: &Config) -> anyhow::Result<()> {
    let editor = &ImageEditor::new(config.limits.clone());
    let replace = args.replace;
    run_each(&args.inputs, config, "Extended", move |path| async move {
        editor.extend_file(&path, replace).await
    })
    .await?
    .into_result()
}

/// Execute the manipulate command.
pub async fn execute_manipulate(args: ManipulateArgs, config: &Config) -> anyhow::Result<()> {
    let ops = parse_ops(&args.ops)?;
    tracing::debug!(
        "Operation chain: {}",
        ops.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
    );

    let editor = &ImageEditor::new(config.limits.clone());
    let ops = &ops;
    let (replace, skip_same) = (args.replace, args.skips_same());
    let tally = run_each(&args.inputs, config, "Processed", move |path| async move {
        editor.apply_ops(&path, ops, replace, skip_same).await
    })
    .await?;

    if tally.total() > 0 {
        print_summary(&tally);
    }
    tally.into_result()
}

/// Apply `op` to every image named by `inputs`, one line per file.
///
/// A failure is reported and the next file is processed; the returned tally
/// carries the failure count.
async fn run_each<F, Fut>(inputs: &[PathBuf], config: &Config, verb: &str, op: F) -> anyhow::Result<EditTally>
where
    F: Fn(PathBuf) -> Fut,
    Fut: std::future::Future<Output = Result<EditOutcome, ImageOpError>>,
{
    let files = collect_inputs(inputs, config)?;
    let mut tally = EditTally::default();

    for file in &files {
        match op(file.path.clone()).await {
            Ok(outcome) => {
                println!("{}", describe(verb, &file.path, &outcome));
                if outcome.modified {
                    tally.processed += 1;
                } else {
                    tally.unchanged += 1;
                }
            }
            Err(e) => {
                tracing::error!("{e}");
                println!("{} {}", style("failed").red().bold(), e);
                tally.failed += 1;
            }
        }
    }
    Ok(tally)
}

fn describe(verb: &str, source: &Path, outcome: &EditOutcome) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    if outcome.modified {
        format!(
            "{} {} -> {}",
            style(verb).green().bold(),
            name(source),
            name(&outcome.output)
        )
    } else {
        format!("{} {}", style("unchanged").dim(), name(source))
    }
}

fn print_summary(tally: &EditTally) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Processed:    {:>8}", tally.processed);
    eprintln!("    No change:    {:>8}", tally.unchanged);
    if tally.failed > 0 {
        eprintln!("    Skipped:      {:>8}", style(tally.failed).red());
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", tally.total());
    eprintln!("  ====================================");
}
