//! Rename pipeline components.
//!
//! - **discovery**: Find image files in a directory
//! - **validate**: Pre-read checks (existence, size)
//! - **load**: Read bytes and detect the real format
//! - **rename**: Identify one file and move it to its brand name
//! - **batch**: Run the rename over many files, isolating failures

pub mod batch;
pub mod discovery;
pub mod load;
pub mod rename;
pub mod validate;

pub use batch::{BatchReport, FileRecord, FileReport};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use load::{ImageLoader, LoadedImage};
pub use rename::{apply_rename, RenameOptions, Renamer};
pub use validate::Validator;
