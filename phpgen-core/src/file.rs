use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use tracing::info;

/// A rendered source file waiting to be written below an output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
    content: String,
}

impl OutputFile {
    /// Create a file at `path`, relative to the output directory.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Relative path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rendered content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Write the file below `base`, replacing whatever is there. Returns
    /// the full path written.
    pub fn write(&self, base: &Path) -> Result<PathBuf> {
        let target = base.join(&self.path);
        write_file(&target, &self.content)?;
        info!(path = %target.display(), bytes = self.content.len(), "wrote file");
        Ok(target)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create directory {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let file = OutputFile::new("src/Models/User.php", "<?php\n");

        let path = file.write(temp.path()).unwrap();

        assert_eq!(path, temp.path().join("src/Models/User.php"));
        let written = fs::read_to_string(temp.path().join("src/Models/User.php")).unwrap();
        assert_eq!(written, "<?php\n");
    }

    #[test]
    fn test_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("User.php"), "old").unwrap();

        OutputFile::new("User.php", "new").write(temp.path()).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("User.php")).unwrap(),
            "new"
        );
    }
}
