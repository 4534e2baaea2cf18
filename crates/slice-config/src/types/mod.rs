//! Build configuration types.

mod config;
mod direction;
mod fragment;
mod machine;

pub use config::BuildConfig;
pub use direction::{BuildDirection, ParseBuildDirectionError};
pub use fragment::Fragment;
pub use machine::{MachineDescription, MachineResolution};

/// Current document format version.
///
/// Documents carrying any other `FileVersion` are rejected on load;
/// there is no migration path.
pub const FILE_VERSION: u32 = 1;
