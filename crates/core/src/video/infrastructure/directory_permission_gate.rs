use std::path::PathBuf;

use crate::video::domain::permission_gate::{PermissionGate, PermissionStatus};

/// Grants access when the frame directory can be listed.
pub struct DirectoryPermissionGate {
    dir: PathBuf,
}

impl DirectoryPermissionGate {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PermissionGate for DirectoryPermissionGate {
    fn request(&self) -> PermissionStatus {
        match std::fs::read_dir(&self.dir) {
            Ok(_) => PermissionStatus::Granted,
            Err(e) => PermissionStatus::Denied(format!("{}: {e}", self.dir.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_dir_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            DirectoryPermissionGate::new(dir.path()).request(),
            PermissionStatus::Granted
        );
    }

    #[test]
    fn test_missing_dir_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let gate = DirectoryPermissionGate::new(dir.path().join("missing"));
        assert!(matches!(gate.request(), PermissionStatus::Denied(_)));
    }
}
