//! Run-scoped cleaned-preference artifact.
//!
//! The cleaned worker sheets may be written to disk so they can be
//! inspected while a run is in flight. The file belongs to the run: it is
//! removed when the guard is dropped, on success, on error and on panic
//! unwinding alike.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ScheduleError;
use crate::models::WorkerSheet;

/// Guard owning a cleaned-preference file on disk.
#[derive(Debug)]
pub struct ScopedArtifact {
    path: PathBuf,
}

impl ScopedArtifact {
    /// Writes `sheets` as pretty JSON to a new file at `path` and takes
    /// ownership of it.
    ///
    /// # Errors
    /// [`ScheduleError::Io`] if `path` already exists (the file is left
    /// untouched) or cannot be written. A partially written file is removed.
    pub fn create(
        path: impl Into<PathBuf>,
        sheets: &[WorkerSheet],
    ) -> Result<Self, ScheduleError> {
        let path = path.into();
        let json = serde_json::to_string_pretty(sheets)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ScheduleError::io(&path, e))?;

        let written = file.write_all(json.as_bytes()).and_then(|()| file.sync_all());
        drop(file);

        // Owned from here on; a failed write drops the guard and the file.
        let artifact = Self { path };
        written.map_err(|e| ScheduleError::io(&artifact.path, e))?;
        tracing::debug!(
            path = %artifact.path.display(),
            sheets = sheets.len(),
            "cleaned preferences written"
        );
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the sheets back.
    pub fn load(&self) -> Result<Vec<WorkerSheet>, ScheduleError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| ScheduleError::io(&self.path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Drop for ScopedArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "cleaned preferences removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove cleaned preferences"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PreferenceTable;

    fn sheets() -> Vec<WorkerSheet> {
        vec![WorkerSheet::new(
            "Amber",
            PreferenceTable::new(["KL"], ["Mon", "Tue"]).with_cell(0, 0, Some(0.3)),
        )]
    }

    #[test]
    fn test_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.json");
        {
            let artifact = ScopedArtifact::create(&path, &sheets()).unwrap();
            assert!(artifact.path().exists());
            assert_eq!(artifact.load().unwrap(), sheets());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_removed_on_early_return() {
        fn failing_run(path: &Path) -> Result<(), ScheduleError> {
            let _artifact = ScopedArtifact::create(path, &sheets())?;
            Err(ScheduleError::EngineUnavailable {
                backend: "none".into(),
            })
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.json");
        assert!(failing_run(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_already_deleted_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned.json");
        let artifact = ScopedArtifact::create(&path, &sheets()).unwrap();
        std::fs::remove_file(&path).unwrap();
        drop(artifact);
    }

    #[test]
    fn test_existing_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.json");
        std::fs::write(&path, "keep me").unwrap();

        assert!(matches!(
            ScopedArtifact::create(&path, &sheets()),
            Err(ScheduleError::Io { .. })
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cleaned.json");
        assert!(matches!(
            ScopedArtifact::create(&path, &sheets()),
            Err(ScheduleError::Io { .. })
        ));
    }
}
