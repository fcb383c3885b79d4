//! `std::fs` backed filesystem.

use std::io;
use std::path::Path;

use trellis_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{TrellisError, TrellisResult},
};

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> TrellisResult<()> {
        std::fs::create_dir_all(path).map_err(|e| io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> TrellisResult<()> {
        std::fs::write(path, content).map_err(|e| io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> TrellisResult<String> {
        std::fs::read_to_string(path).map_err(|e| io_error(path, e, "read file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> TrellisResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)
                .map_err(|e| io_error(path, e, "read metadata"))?
                .permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            std::fs::set_permissions(path, perms)
                .map_err(|e| io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        let _ = (path, executable);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_empty_dir(&self, path: &Path) -> TrellisResult<bool> {
        match std::fs::read_dir(path) {
            Ok(mut entries) => Ok(entries.next().is_none()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(io_error(path, e, "list directory")),
        }
    }

    fn remove_file(&self, path: &Path) -> TrellisResult<()> {
        std::fs::remove_file(path).map_err(|e| io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> TrellisResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| io_error(path, e, "remove directory"))
    }
}

fn io_error(path: &Path, e: io::Error, operation: &str) -> TrellisError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_and_empty_dirs_count_as_empty() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        assert!(fs.is_empty_dir(&tmp.path().join("missing")).unwrap());
        assert!(fs.is_empty_dir(tmp.path()).unwrap());

        fs.write_file(&tmp.path().join("a.txt"), "a").unwrap();
        assert!(!fs.is_empty_dir(tmp.path()).unwrap());
    }

    #[test]
    fn write_then_read() {
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let dir = tmp.path().join("nested/dir");
        fs.create_dir_all(&dir).unwrap();
        fs.write_file(&dir.join("file.txt"), "hello").unwrap();
        assert_eq!(fs.read_file(&dir.join("file.txt")).unwrap(), "hello");

        fs.remove_file(&dir.join("file.txt")).unwrap();
        assert!(!fs.exists(&dir.join("file.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_set() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let script = tmp.path().join("run.sh");
        fs.write_file(&script, "#!/bin/sh\n").unwrap();
        fs.set_permissions(&script, true).unwrap();
        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0);
    }

    #[test]
    fn read_missing_file_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .read_file(&tmp.path().join("nope"))
            .unwrap_err();
        assert!(matches!(
            err,
            TrellisError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
