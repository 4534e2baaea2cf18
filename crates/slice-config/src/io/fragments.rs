//! G-code fragment directory.
//!
//! Each profile `dir/name.ext` owns a sibling directory `dir/name/` holding
//! one plain-text file per [`Fragment`]. Files are read and written whole,
//! byte-for-byte, with no line-ending conversion.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::types::Fragment;

/// Fragment directory for the document at `path`: the document's parent
/// joined with its file name minus the extension.
pub fn fragment_dir_for(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default();
    match path.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    }
}

/// Read a fragment file whole. Bytes that are not valid UTF-8 become
/// U+FFFD; only I/O failures are errors.
pub fn read_fragment(dir: &Path, fragment: Fragment) -> Result<String> {
    let path = dir.join(fragment.file_name());
    let bytes = fs::read(&path).map_err(|e| ConfigError::io("read", path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_fragment(dir: &Path, fragment: Fragment, text: &str) -> Result<()> {
    let path = dir.join(fragment.file_name());
    fs::write(&path, text).map_err(|e| ConfigError::io("write", path, e))
}

/// What happened to one fragment during a load or save.
#[derive(Debug)]
pub enum FragmentStatus {
    /// Read from its file.
    Loaded,
    /// Written to its file.
    Written,
    /// Read or write failed. On load the field was set to an empty string.
    Failed(ConfigError),
}

impl FragmentStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct FragmentOutcome {
    pub fragment: Fragment,
    pub status: FragmentStatus,
}

/// Per-fragment results of a fragment directory load or save.
#[derive(Debug, Default)]
pub struct FragmentReport {
    /// Directory that was used, if the config was bound to a file.
    pub directory: Option<PathBuf>,
    /// The directory did not exist and was populated with canned defaults.
    pub bootstrapped: bool,
    /// Directory creation failure, or [`ConfigError::Unbound`].
    pub directory_error: Option<ConfigError>,
    pub outcomes: Vec<FragmentOutcome>,
}

impl FragmentReport {
    pub(crate) fn for_directory(directory: PathBuf) -> Self {
        Self {
            directory: Some(directory),
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, fragment: Fragment, status: FragmentStatus) {
        self.outcomes.push(FragmentOutcome { fragment, status });
    }

    pub fn status(&self, fragment: Fragment) -> Option<&FragmentStatus> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.fragment == fragment)
            .map(|outcome| &outcome.status)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FragmentOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.status.is_failed())
    }

    /// True when the directory was usable and all five fragments succeeded.
    pub fn is_complete(&self) -> bool {
        self.directory_error.is_none()
            && self.outcomes.len() == Fragment::ALL.len()
            && self.failures().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fragment_dir_strips_extension() {
        assert_eq!(
            fragment_dir_for(Path::new("/profiles/resin.slicing")),
            PathBuf::from("/profiles/resin")
        );
        assert_eq!(
            fragment_dir_for(Path::new("/profiles/resin.v2.slicing")),
            PathBuf::from("/profiles/resin.v2")
        );
        assert_eq!(fragment_dir_for(Path::new("resin.xml")), PathBuf::from("resin"));
    }

    #[test]
    fn fragment_text_is_written_verbatim() {
        let dir = tempdir().unwrap();
        let text = "G1 Z5\r\nG1 Z-5\n";
        write_fragment(dir.path(), Fragment::PreLift, text).unwrap();

        assert_eq!(
            fs::read(dir.path().join("prelift.gcode")).unwrap(),
            text.as_bytes()
        );
        assert_eq!(read_fragment(dir.path(), Fragment::PreLift).unwrap(), text);
    }

    #[test]
    fn invalid_utf8_is_replaced_not_failed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("start.gcode"), b"(Platform 75\xB0C)\r\nG21\r\n").unwrap();
        let text = read_fragment(dir.path(), Fragment::Header).unwrap();
        assert_eq!(text, "(Platform 75\u{FFFD}C)\r\nG21\r\n");
    }

    #[test]
    fn missing_fragment_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_fragment(dir.path(), Fragment::Footer).unwrap_err();
        assert!(matches!(err, ConfigError::Io { operation: "read", .. }));
        assert_eq!(err.path(), Some(dir.path().join("end.gcode").as_path()));
    }

    #[test]
    fn report_completeness() {
        let mut report = FragmentReport::for_directory(PathBuf::from("p"));
        for fragment in Fragment::ALL {
            report.push(fragment, FragmentStatus::Loaded);
        }
        assert!(report.is_complete());

        report.outcomes[1].status = FragmentStatus::Failed(ConfigError::Unbound);
        assert!(!report.is_complete());
        assert_eq!(report.failures().count(), 1);
        assert!(report.status(Fragment::Footer).unwrap().is_failed());
    }
}
