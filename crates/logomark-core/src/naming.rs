//! Filename derivation: brand text to identifier, identifier to free path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Name used whenever a brand cannot be turned into a usable identifier.
pub const FALLBACK_NAME: &str = "unknown";

/// Longest identifier produced by [`sanitize_name`].
pub const MAX_NAME_LEN: usize = 64;

/// Convert arbitrary model output into a lowercase `snake_case` identifier.
///
/// Every run of characters outside `[a-z0-9]` collapses to one underscore,
/// leading/trailing underscores are dropped, and an empty result becomes
/// [`FALLBACK_NAME`].
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }

    if out.len() > MAX_NAME_LEN {
        out.truncate(MAX_NAME_LEN);
        let trimmed = out.trim_end_matches('_').len();
        out.truncate(trimmed);
    }

    if out.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        out
    }
}

/// Build `base.ext`, or just `base` when there is no extension.
fn file_name(base: &str, ext: &str) -> String {
    if ext.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{ext}")
    }
}

/// Whether two paths name the same file, tolerating `./x` vs `x` spellings.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Collision resolver that remembers every path it handed out during a run.
///
/// A batch in dry-run mode never creates its targets on disk, so checking
/// existence alone would hand the same name to two files. Each candidate is
/// checked against both the filesystem (freshly, every time) and this set.
/// Sources a dry run would have moved away are recorded with
/// [`vacate`](Self::vacate) and count as free again.
#[derive(Debug, Default)]
pub struct NameReservations {
    reserved: HashSet<PathBuf>,
    vacated: HashSet<PathBuf>,
}

impl NameReservations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the first free path among `base.ext`, `base_2.ext`, `base_3.ext`, ...
    /// and reserve it.
    pub fn resolve(&mut self, dir: &Path, base: &str, ext: &str) -> PathBuf {
        self.resolve_inner(dir, base, ext, None)
    }

    /// Like [`resolve`](Self::resolve), but `source` counts as free.
    ///
    /// A file that already sits on one of the candidate names gets that name
    /// back instead of being moved further down the sequence.
    pub fn resolve_for(&mut self, source: &Path, dir: &Path, base: &str, ext: &str) -> PathBuf {
        self.resolve_inner(dir, base, ext, Some(source))
    }

    fn resolve_inner(&mut self, dir: &Path, base: &str, ext: &str, own: Option<&Path>) -> PathBuf {
        let mut candidate = dir.join(file_name(base, ext));
        let mut counter = 2u32;

        loop {
            if let Some(source) = own {
                if same_file(&candidate, source) {
                    candidate = source.to_path_buf();
                    break;
                }
            }
            if !self.is_taken(&candidate) {
                break;
            }
            candidate = dir.join(file_name(&format!("{base}_{counter}"), ext));
            counter += 1;
        }

        tracing::trace!("Reserved {:?}", candidate);
        self.reserved.insert(candidate.clone());
        candidate
    }

    /// Mark a path as used without resolving (e.g. a file kept under its own name).
    pub fn reserve(&mut self, path: &Path) {
        self.reserved.insert(path.to_path_buf());
    }

    /// Record that `path` would no longer be on disk once its move is applied.
    pub fn vacate(&mut self, path: &Path) {
        self.vacated.insert(path.to_path_buf());
    }

    /// Whether `path` is on disk (and not vacated) or already handed out in this run.
    pub fn is_taken(&self, path: &Path) -> bool {
        self.reserved.contains(path) || (!self.vacated.contains(path) && path.exists())
    }

    /// Number of paths handed out so far.
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}
