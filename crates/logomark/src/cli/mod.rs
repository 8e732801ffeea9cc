//! CLI command implementations.

pub mod config;
pub mod edit;
pub mod rename;

use logomark_core::{Config, DiscoveredFile, FileDiscovery};
use std::collections::HashSet;
use std::path::PathBuf;

/// Every image named on the command line: files as given, directories
/// expanded to their supported images. A path listed twice is kept once.
pub(crate) fn collect_inputs(inputs: &[PathBuf], config: &Config) -> anyhow::Result<Vec<DiscoveredFile>> {
    if let Some(missing) = inputs.iter().find(|p| !p.exists()) {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            missing
        );
    }

    let discovery = FileDiscovery::new(config.processing.clone());
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for input in inputs {
        let found = discovery.discover(input);
        if input.is_dir() {
            if found.is_empty() {
                tracing::warn!("No supported image files found in {:?}", input);
            } else {
                tracing::info!("Found {} image(s) in {:?}", found.len(), input);
            }
        }
        files.extend(found.into_iter().filter(|f| seen.insert(f.path.clone())));
    }
    Ok(files)
}
