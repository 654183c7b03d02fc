use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelStageError {
    #[error("failed to create staging directory {path}: {source}")]
    StagingDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read model resource: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not determine staging directory")]
    NoStagingDir,
}

/// Copies a bundled model resource into a private directory so detector
/// constructors can open it by path.
pub struct ModelStager {
    root: PathBuf,
}

impl ModelStager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stager rooted in the platform cache directory.
    ///
    /// - macOS: `~/Library/Caches/facecam/`
    /// - Linux: `$XDG_CACHE_HOME/facecam/` or `~/.cache/facecam/`
    /// - Windows: `%LOCALAPPDATA%/facecam/`
    pub fn in_cache_dir() -> Result<Self, ModelStageError> {
        dirs::cache_dir()
            .map(|d| Self::new(d.join("facecam")))
            .ok_or(ModelStageError::NoStagingDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a byte-exact copy of `resource` to `<root>/cascade-XXXX/<name>`.
    ///
    /// The copy goes to a `.part` file first and is renamed once complete,
    /// so a failed stage never leaves a truncated model behind.
    pub fn stage<R: Read>(&self, mut resource: R, name: &str) -> Result<ModelArtifact, ModelStageError> {
        fs::create_dir_all(&self.root).map_err(|e| ModelStageError::StagingDir {
            path: self.root.clone(),
            source: e,
        })?;
        let dir = tempfile::Builder::new()
            .prefix("cascade-")
            .tempdir_in(&self.root)
            .map_err(|e| ModelStageError::StagingDir {
                path: self.root.clone(),
                source: e,
            })?;

        let path = dir.path().join(name);
        let temp_path = path.with_extension("part");
        let mut file = fs::File::create(&temp_path).map_err(|e| ModelStageError::Write {
            path: temp_path.clone(),
            source: e,
        })?;

        let mut buffer = [0u8; 4096];
        let mut written: u64 = 0;
        loop {
            let n = match resource.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ModelStageError::Read(e)),
            };
            file.write_all(&buffer[..n])
                .map_err(|e| ModelStageError::Write {
                    path: temp_path.clone(),
                    source: e,
                })?;
            written += n as u64;
        }
        file.flush().map_err(|e| ModelStageError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|e| ModelStageError::Write {
            path: path.clone(),
            source: e,
        })?;

        log::info!("Staged model ({written} bytes) at {}", path.display());
        Ok(ModelArtifact {
            dir: Some(dir),
            path,
        })
    }
}

/// A staged model file. Dropping it removes the staging directory.
#[derive(Debug)]
pub struct ModelArtifact {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ModelArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the staging directory. Failures are logged, never returned.
    pub fn release(mut self) {
        self.remove_dir();
    }

    fn remove_dir(&mut self) {
        if let Some(dir) = self.dir.take() {
            let dir_path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => log::debug!("Removed staged model at {}", dir_path.display()),
                Err(e) => log::warn!("Failed to remove {}: {e}", dir_path.display()),
            }
        }
    }
}

impl Drop for ModelArtifact {
    fn drop(&mut self) {
        self.remove_dir();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "asset unreadable"))
        }
    }

    fn entries(dir: &Path) -> usize {
        fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_stage_writes_byte_exact_copy() {
        let tmp = TempDir::new().unwrap();
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let artifact = ModelStager::new(tmp.path())
            .stage(payload.as_slice(), "cascade.bin")
            .unwrap();

        assert!(artifact.path().ends_with("cascade.bin"));
        assert_eq!(fs::read(artifact.path()).unwrap(), payload);
        assert!(!artifact.path().with_extension("part").exists());
    }

    #[test]
    fn test_release_removes_staging_directory() {
        let tmp = TempDir::new().unwrap();
        let artifact = ModelStager::new(tmp.path())
            .stage(&b"model"[..], "cascade.bin")
            .unwrap();
        let staged = artifact.path().to_path_buf();

        artifact.release();

        assert!(!staged.exists());
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn test_drop_removes_staging_directory() {
        let tmp = TempDir::new().unwrap();
        let staged = {
            let artifact = ModelStager::new(tmp.path())
                .stage(&b"model"[..], "cascade.bin")
                .unwrap();
            artifact.path().to_path_buf()
        };
        assert!(!staged.exists());
    }

    #[test]
    fn test_stage_creates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("nested").join("cache");
        let artifact = ModelStager::new(&root).stage(&b"x"[..], "m.bin").unwrap();
        assert!(artifact.path().starts_with(&root));
    }

    #[test]
    fn test_unreadable_resource_is_read_error_and_leaves_nothing() {
        let tmp = TempDir::new().unwrap();
        let result = ModelStager::new(tmp.path()).stage(FailingReader, "cascade.bin");

        assert!(matches!(result, Err(ModelStageError::Read(_))));
        assert_eq!(entries(tmp.path()), 0);
    }

    #[test]
    fn test_unwritable_root_is_staging_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();

        let result = ModelStager::new(blocker.join("sub")).stage(&b"x"[..], "m.bin");

        assert!(matches!(result, Err(ModelStageError::StagingDir { .. })));
    }

    #[test]
    fn test_cache_dir_stager_is_named() {
        if let Ok(stager) = ModelStager::in_cache_dir() {
            assert!(stager.root().ends_with("facecam"));
        }
    }
}
