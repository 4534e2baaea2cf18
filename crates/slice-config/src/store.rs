//! Profile load/save orchestration.
//!
//! [`ProfileStore`] is the boundary callers use: every failure is recorded
//! to its [`DiagnosticLog`] and collapsed to a `bool`. The `try_*` variants
//! return the underlying [`ConfigError`] instead.

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::io::{
    FragmentReport, FragmentStatus, fragment_dir_for, read_document, read_fragment,
    write_document, write_fragment,
};
use crate::log::{DiagnosticLog, LogEntry, Severity, TracingLog};
use crate::types::{BuildConfig, Fragment};

/// Loads and saves build config profiles, reporting failures to `L`.
#[derive(Debug, Default)]
pub struct ProfileStore<L = TracingLog> {
    log: L,
}

impl ProfileStore<TracingLog> {
    /// Store that reports through `tracing`.
    pub fn new() -> Self {
        Self { log: TracingLog }
    }
}

impl<L: DiagnosticLog> ProfileStore<L> {
    pub fn with_log(log: L) -> Self {
        Self { log }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    fn report(&self, severity: Severity, error: &ConfigError) {
        self.log.record(LogEntry::from_error(severity, error));
    }

    /// Load the profile at `path` into `config`.
    ///
    /// Returns `false` (and logs why) if the document is missing, malformed
    /// or carries another format version. Scalar fields are only assigned
    /// once the whole document has parsed.
    pub fn load(&self, config: &mut BuildConfig, path: impl AsRef<Path>) -> bool {
        match self.try_load(config, path.as_ref()) {
            Ok(()) => true,
            Err(error) => {
                self.report(Severity::Error, &error);
                false
            }
        }
    }

    /// Bind `config` to `path`, load its fragments, then its document.
    pub fn try_load(&self, config: &mut BuildConfig, path: &Path) -> Result<()> {
        config.source_path = Some(path.to_path_buf());
        self.load_fragments(config);

        let fields = read_document(path)?;
        fields.apply_to(config);

        tracing::info!("Loaded build config from {}", path.display());
        Ok(())
    }

    /// Save `config` as the profile at `path`.
    ///
    /// Returns `false` (and logs why) if the document could not be written.
    /// Fragment write failures are logged but do not fail the save.
    pub fn save(&self, config: &mut BuildConfig, path: impl AsRef<Path>) -> bool {
        match self.try_save(config, path.as_ref()) {
            Ok(()) => true,
            Err(error) => {
                self.report(Severity::Error, &error);
                false
            }
        }
    }

    /// Bind `config` to `path`, write its document, then its fragments.
    pub fn try_save(&self, config: &mut BuildConfig, path: &Path) -> Result<()> {
        config.source_path = Some(path.to_path_buf());
        write_document(config, path)?;
        self.save_fragments(config);

        tracing::info!("Saved build config to {}", path.display());
        Ok(())
    }

    /// Read the five fragments from the directory of `config.source_path`.
    ///
    /// A missing directory is created and filled with canned defaults. A
    /// fragment whose file cannot be read becomes an empty string; the
    /// others are still read.
    pub fn load_fragments(&self, config: &mut BuildConfig) -> FragmentReport {
        let Some(dir) = config.source_path.as_deref().map(fragment_dir_for) else {
            return self.unbound();
        };

        if !dir.is_dir() {
            tracing::info!("Creating default G-code fragments in {}", dir.display());
            config.reset_fragments();
            let mut report = self.write_fragments(config, &dir);
            report.bootstrapped = true;
            return report;
        }

        let mut report = FragmentReport::for_directory(dir.clone());
        for fragment in Fragment::ALL {
            let status = match read_fragment(&dir, fragment) {
                Ok(text) => {
                    tracing::debug!(fragment = %fragment, bytes = text.len(), "Loaded fragment");
                    *config.fragment_mut(fragment) = text;
                    FragmentStatus::Loaded
                }
                Err(error) => {
                    self.report(Severity::Warning, &error);
                    config.fragment_mut(fragment).clear();
                    FragmentStatus::Failed(error)
                }
            };
            report.push(fragment, status);
        }
        report
    }

    /// Write the five fragments into the directory of `config.source_path`.
    pub fn save_fragments(&self, config: &BuildConfig) -> FragmentReport {
        match config.source_path.as_deref().map(fragment_dir_for) {
            Some(dir) => self.write_fragments(config, &dir),
            None => self.unbound(),
        }
    }

    /// Create `dir` if needed and write every fragment into it. A failure
    /// at either step is logged and the remaining writes still run.
    fn write_fragments(&self, config: &BuildConfig, dir: &Path) -> FragmentReport {
        let mut report = FragmentReport::for_directory(dir.to_path_buf());

        if let Err(source) = fs::create_dir_all(dir) {
            let error = ConfigError::io("create directory", dir, source);
            self.report(Severity::Error, &error);
            report.directory_error = Some(error);
        }

        for fragment in Fragment::ALL {
            let status = match write_fragment(dir, fragment, config.fragment(fragment)) {
                Ok(()) => {
                    tracing::debug!(fragment = %fragment, "Saved fragment");
                    FragmentStatus::Written
                }
                Err(error) => {
                    self.report(Severity::Warning, &error);
                    FragmentStatus::Failed(error)
                }
            };
            report.push(fragment, status);
        }
        report
    }

    fn unbound(&self) -> FragmentReport {
        let error = ConfigError::Unbound;
        self.report(Severity::Error, &error);
        FragmentReport {
            directory_error: Some(error),
            ..FragmentReport::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MemoryLog;
    use tempfile::tempdir;

    #[test]
    fn unbound_config_reports_instead_of_touching_disk() {
        let store = ProfileStore::with_log(MemoryLog::new());
        let mut config = BuildConfig::new();

        let report = store.load_fragments(&mut config);
        assert!(report.directory.is_none());
        assert!(matches!(report.directory_error, Some(ConfigError::Unbound)));
        assert_eq!(config, BuildConfig::new());
        assert_eq!(store.log().len(), 1);

        let report = store.save_fragments(&config);
        assert!(!report.is_complete());
        assert_eq!(store.log().len(), 2);
    }

    #[test]
    fn save_binds_path_and_writes_both_tiers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("resin.slicing");
        let store = ProfileStore::with_log(MemoryLog::new());
        let mut config = BuildConfig::new();

        assert!(store.save(&mut config, &path));
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));
        assert!(path.is_file());
        for fragment in Fragment::ALL {
            assert!(dir.path().join("resin").join(fragment.file_name()).is_file());
        }
        assert!(store.log().is_empty());
    }

    #[test]
    fn load_of_missing_document_fails_and_logs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.slicing");
        let store = ProfileStore::with_log(MemoryLog::new());
        let mut config = BuildConfig::new();

        assert!(!store.load(&mut config, &path));
        assert_eq!(config.source_path.as_deref(), Some(path.as_path()));

        let entries = store.log().entries();
        let last = entries.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn directory_creation_failure_still_attempts_writes() {
        let dir = tempdir().unwrap();
        // A plain file where the fragment directory should go.
        fs::write(dir.path().join("blocked"), "").unwrap();
        let store = ProfileStore::with_log(MemoryLog::new());
        let mut config = BuildConfig::new();
        config.source_path = Some(dir.path().join("blocked.slicing"));

        let report = store.save_fragments(&config);
        assert!(report.directory_error.is_some());
        assert_eq!(report.outcomes.len(), Fragment::ALL.len());
        assert_eq!(report.failures().count(), Fragment::ALL.len());
        assert_eq!(store.log().len(), 1 + Fragment::ALL.len());
    }
}
