//! Definition tree subsystem.
//!
//! # Data Flow
//! ```text
//! <root>/<segment>/.../<METHOD>/<variant>.json
//!     → source.rs (list directories, read files)
//!     → loader.rs (walk tree, one Definition per variant file)
//!     → variant.rs (decode + validate response definition)
//!     → loader.rs (group by endpoint, require `default`)
//!     → routing::Registry
//! ```
//!
//! # Design Decisions
//! - Loading is all-or-nothing: any bad file aborts startup
//! - The loader only sees the `DefinitionSource` trait, never `std::fs`
//! - Directory entries are sorted before use, so the same tree always
//!   yields the same registry and the same first error

pub mod loader;
pub mod source;
pub mod variant;

pub use loader::{load, load_dir, scan, Definition, FileErrorKind, LoadError};
pub use source::{DefinitionSource, Entry, EntryKind, FsSource, MemorySource};
pub use variant::{Variant, VariantError};
