pub mod model;
pub mod table;

use std::{
    fmt,
    path::{Path, PathBuf},
};

use percent_encoding::percent_decode_str;
use url::Url;

/// Location of a document. `Empty` marks an untitled document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DocumentUrl {
    #[default]
    Empty,
    Local(PathBuf),
    Remote(Url),
}

impl DocumentUrl {
    pub fn from_local_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.as_os_str().is_empty() {
            Self::Empty
        } else {
            Self::Local(path)
        }
    }

    /// Interprets a command-line or file-dialog string.
    ///
    /// `file:` URLs naming a local path and bare paths become local files,
    /// relative paths are resolved against the working directory. Any other
    /// URL is kept as a remote location.
    pub fn from_user_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }

        // A single letter scheme is a drive.
        if let Ok(url) = Url::parse(trimmed)
            && url.scheme().len() > 1
        {
            if url.scheme() == "file"
                && let Ok(path) = url.to_file_path()
            {
                return Self::from_local_file(path);
            }
            return Self::Remote(url);
        }

        let path = PathBuf::from(trimmed);
        if path.is_absolute() {
            Self::Local(path)
        } else {
            match std::env::current_dir() {
                Ok(cwd) => Self::Local(cwd.join(path)),
                Err(_) => Self::Local(path),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn to_local_file(&self) -> Option<&Path> {
        match self {
            Self::Local(path) => Some(path.as_path()),
            _ => None,
        }
    }

    /// Last path segment, empty for untitled documents and bare hosts.
    pub fn file_name(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            Self::Remote(url) => url
                .path_segments()
                .and_then(Iterator::last)
                .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// Local files render as plain paths, remote documents as their URL.
    pub fn display_string(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Local(path) => path.display().to_string(),
            Self::Remote(url) => url.to_string(),
        }
    }
}

impl fmt::Display for DocumentUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}
