//! Slice/build configuration profiles for DLP resin printers.
//!
//! A profile is two things on disk: an XML document holding the scalar
//! build settings, and a sibling directory holding five G-code fragments
//! that get spliced into generated build scripts.
//!
//! # File Layout
//!
//! ```text
//! profiles/
//! ├── resin.slicing        <SliceBuildConfig> document, FileVersion 1
//! └── resin/
//!     ├── start.gcode      header
//!     ├── end.gcode        footer
//!     ├── prelift.gcode
//!     ├── postlift.gcode
//!     └── preslice.gcode
//! ```
//!
//! # Example
//!
//! ```ignore
//! use slice_config::{BuildConfig, ProfileStore};
//!
//! let store = ProfileStore::new();
//! let mut config = BuildConfig::new();
//! config.layer_time_ms = 8000;
//! store.save(&mut config, "profiles/resin.slicing");
//!
//! let mut loaded = BuildConfig::new();
//! assert!(store.load(&mut loaded, "profiles/resin.slicing"));
//! ```
//!
//! # Architecture
//!
//! - `types/` - The config record, build direction, fragment slots, machine seam
//! - `io/` - Document encoding/parsing and fragment file access
//! - `store.rs` - Load/save orchestration with bool results
//! - `log.rs` - Injected diagnostic log
//! - `error.rs` - Error types with user-friendly messages

mod error;
mod io;
mod log;
mod store;
mod types;

pub use error::{ConfigError, Result};
pub use io::{
    DocumentFields, FragmentOutcome, FragmentReport, FragmentStatus, ROOT_ELEMENT,
    encode_document, fragment_dir_for, parse_document, read_document, read_fragment,
    write_document, write_fragment,
};
pub use log::{DiagnosticLog, LogEntry, MemoryLog, Severity, TracingLog};
pub use store::ProfileStore;
pub use types::{
    BuildConfig, BuildDirection, FILE_VERSION, Fragment, MachineDescription, MachineResolution,
    ParseBuildDirectionError,
};
