use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("refusing to save under {0:?}: not a plain file name")]
    InvalidName(String),
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Drops restored images into one output directory.
///
/// Bytes land in a hidden temp file next to the target and are renamed over
/// it, so a reader never sees a half-written image.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
}

impl ResultWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Saves `bytes` as `file_name` inside the output directory and returns
    /// the final path. `file_name` must not reach outside that directory.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, SaveError> {
        if !is_plain_name(file_name) {
            return Err(SaveError::InvalidName(file_name.to_string()));
        }
        self.prepare_dir()?;

        let target = self.dir.join(file_name);
        let io_err = |source: io::Error| SaveError::Io {
            path: target.clone(),
            source,
        };
        let mut staged = Builder::new()
            .prefix(".unblur-")
            .suffix(".part")
            .tempfile_in(&self.dir)
            .map_err(io_err)?;
        staged.write_all(bytes).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged.persist(&target).map_err(|e| io_err(e.error))?;
        Ok(target)
    }

    fn prepare_dir(&self) -> Result<(), SaveError> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(SaveError::NotADirectory(self.dir.clone())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&self.dir).map_err(|source| SaveError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
            Err(source) => Err(SaveError::Io {
                path: self.dir.clone(),
                source,
            }),
        }
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().is_some_and(|f| f == name)
}

#[cfg(test)]
mod tests {
    use super::is_plain_name;

    #[test]
    fn only_bare_names_are_plain() {
        assert!(is_plain_name("restored_cat.png"));
        assert!(!is_plain_name(""));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("../escape.png"));
        assert!(!is_plain_name("sub/dir.png"));
        assert!(!is_plain_name("sub\\dir.png"));
    }
}
