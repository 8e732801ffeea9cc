//! Sequential batch renaming with per-file failure isolation.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::error::RenameResult;
use crate::types::RenameDecision;

use super::discovery::DiscoveredFile;
use super::rename::Renamer;

/// Outcome for one file of a batch.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: RenameResult<RenameDecision>,
}

impl FileReport {
    /// Flatten into a serializable record.
    pub fn to_record(&self) -> FileRecord {
        match &self.result {
            Ok(decision) => FileRecord {
                source: self.path.clone(),
                target: Some(decision.target.clone()),
                brand_name: Some(decision.brand.brand_name.clone()),
                is_confident: Some(decision.brand.is_confident),
                applied: decision.applied,
                error_kind: None,
                error: None,
            },
            Err(e) => FileRecord {
                source: self.path.clone(),
                target: None,
                brand_name: None,
                is_confident: None,
                applied: false,
                error_kind: Some(e.kind().to_string()),
                error: Some(e.to_string()),
            },
        }
    }
}

/// One line of the machine-readable report.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_confident: Option<bool>,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything that happened during a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// Files actually moved.
    pub fn renamed(&self) -> usize {
        self.count(|d| d.applied)
    }

    /// Dry-run decisions that would move a file.
    pub fn previewed(&self) -> usize {
        self.count(|d| !d.applied && !d.is_unchanged())
    }

    /// Files already carrying their resolved name.
    pub fn unchanged(&self) -> usize {
        self.count(RenameDecision::is_unchanged)
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.result.is_err()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.files.len() - self.failed()
    }

    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn records(&self) -> Vec<FileRecord> {
        self.files.iter().map(FileReport::to_record).collect()
    }

    fn count(&self, pred: impl Fn(&RenameDecision) -> bool) -> usize {
        self.files
            .iter()
            .filter(|f| f.result.as_ref().is_ok_and(&pred))
            .count()
    }
}

impl Renamer {
    /// Rename every file in order, one provider call at a time.
    ///
    /// A failure is logged and recorded, and the batch moves on. `on_file` is
    /// called after each file so callers can drive a progress display.
    pub async fn rename_batch<F>(&mut self, files: &[DiscoveredFile], mut on_file: F) -> BatchReport
    where
        F: FnMut(&FileReport),
    {
        let start = Instant::now();
        let limit = self.options.max_files.unwrap_or(files.len()).min(files.len());
        if limit < files.len() {
            tracing::info!("Limiting batch to {} of {} files", limit, files.len());
        }

        let interval = self.options.request_interval;
        let mut report = BatchReport::default();

        for (i, file) in files.iter().take(limit).enumerate() {
            if i > 0 && !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }

            let result = self.rename_file(&file.path).await;
            if let Err(e) = &result {
                tracing::error!("Failed to rename {:?}: {}", file.path, e);
            }

            let file_report = FileReport {
                path: file.path.clone(),
                result,
            };
            on_file(&file_report);
            report.files.push(file_report);
        }

        report.elapsed = start.elapsed();
        tracing::info!(
            "Batch finished: {} succeeded, {} failed in {:.1}s",
            report.succeeded(),
            report.failed(),
            report.elapsed.as_secs_f64()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LimitsConfig, ProcessingConfig};
    use crate::pipeline::{FileDiscovery, RenameOptions};
    use crate::test_util::{brand_json, list_dir, provider_down, write_test_image, ScriptedProvider};
    use std::sync::Arc;

    fn discover(dir: &std::path::Path) -> Vec<DiscoveredFile> {
        FileDiscovery::new(ProcessingConfig::default()).discover(dir)
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_test_image(&dir.path().join(name), 4, 4);
        }

        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(brand_json("Nike", true)),
            Err(provider_down()),
            Ok(brand_json("Adidas", true)),
        ]));
        let mut renamer = Renamer::new(provider.clone(), LimitsConfig::default(), RenameOptions::default());

        let mut seen = Vec::new();
        let report = renamer
            .rename_batch(&discover(dir.path()), |f| seen.push(f.path.clone()))
            .await;

        assert_eq!(provider.calls(), 3);
        assert_eq!(seen.len(), 3);
        assert_eq!(report.renamed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
        assert_eq!(list_dir(dir.path()), vec!["adidas.png", "b.png", "nike.png"]);

        let records = report.records();
        assert_eq!(records[1].error_kind.as_deref(), Some("provider"));
        assert!(records[1].target.is_none());
    }

    #[tokio::test]
    async fn test_batch_dry_run_reserves_names() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png"] {
            write_test_image(&dir.path().join(name), 4, 4);
        }
        let before = list_dir(dir.path());

        let provider = Arc::new(ScriptedProvider::brands(&["Nike", "NIKE"]));
        let options = RenameOptions {
            dry_run: true,
            ..RenameOptions::default()
        };
        let mut renamer = Renamer::new(provider, LimitsConfig::default(), options);
        let report = renamer.rename_batch(&discover(dir.path()), |_| {}).await;

        let targets: Vec<_> = report
            .files
            .iter()
            .map(|f| f.result.as_ref().unwrap().target.clone())
            .collect();
        assert_eq!(targets, vec![dir.path().join("nike.png"), dir.path().join("nike_2.png")]);
        assert_eq!(report.previewed(), 2);
        assert_eq!(report.renamed(), 0);
        assert_eq!(list_dir(dir.path()), before);
    }

    #[tokio::test]
    async fn test_batch_dry_run_matches_real_run() {
        // acme.png moves to zeta.png, freeing its name for scan.png.
        let dir = tempfile::tempdir().unwrap();
        for name in ["acme.png", "scan.png"] {
            write_test_image(&dir.path().join(name), 4, 4);
        }
        let files = discover(dir.path());

        let preview = RenameOptions {
            dry_run: true,
            ..RenameOptions::default()
        };
        let provider = Arc::new(ScriptedProvider::brands(&["Zeta", "Acme"]));
        let mut renamer = Renamer::new(provider, LimitsConfig::default(), preview);
        let previewed: Vec<_> = renamer
            .rename_batch(&files, |_| {})
            .await
            .files
            .iter()
            .map(|f| f.result.as_ref().unwrap().target.clone())
            .collect();

        let provider = Arc::new(ScriptedProvider::brands(&["Zeta", "Acme"]));
        let mut renamer = Renamer::new(provider, LimitsConfig::default(), RenameOptions::default());
        let applied: Vec<_> = renamer
            .rename_batch(&files, |_| {})
            .await
            .files
            .iter()
            .map(|f| f.result.as_ref().unwrap().target.clone())
            .collect();

        assert_eq!(previewed, vec![dir.path().join("zeta.png"), dir.path().join("acme.png")]);
        assert_eq!(previewed, applied);
        assert_eq!(list_dir(dir.path()), vec!["acme.png", "zeta.png"]);
    }

    #[tokio::test]
    async fn test_batch_respects_max_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.png", "c.png"] {
            write_test_image(&dir.path().join(name), 4, 4);
        }

        let provider = Arc::new(ScriptedProvider::brands(&["One", "Two", "Three"]));
        let options = RenameOptions {
            max_files: Some(2),
            ..RenameOptions::default()
        };
        let mut renamer = Renamer::new(provider.clone(), LimitsConfig::default(), options);
        let report = renamer.rename_batch(&discover(dir.path()), |_| {}).await;

        assert_eq!(report.files.len(), 2);
        assert_eq!(provider.calls(), 2);
        assert!(dir.path().join("c.png").exists());
    }

    #[tokio::test]
    async fn test_batch_counts_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        write_test_image(&dir.path().join("shell.png"), 4, 4);

        let provider = Arc::new(ScriptedProvider::brands(&["Shell"]));
        let mut renamer = Renamer::new(provider, LimitsConfig::default(), RenameOptions::default());
        let report = renamer.rename_batch(&discover(dir.path()), |_| {}).await;

        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.previewed(), 0);
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(ScriptedProvider::brands(&[]));
        let mut renamer = Renamer::new(provider, LimitsConfig::default(), RenameOptions::default());
        let report = renamer.rename_batch(&discover(dir.path()), |_| {}).await;

        assert!(report.files.is_empty());
        assert!(report.is_success());
    }
}
