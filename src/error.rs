use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Every failure the rename pipeline can hit. All of them end the process.
#[derive(Debug, Error)]
pub enum PreifyError {
    #[error("File \"{}\" does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("{context} '{}': {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error while renaming '{}' to '{}': {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot rename to '{}': destination already exists", path.display())]
    DestinationExists { path: PathBuf },
}

impl PreifyError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PreifyError>;
