//! `file://` uris identifying template and host-language files.
//!
//! Uris are kept in the serialized form produced by [`Url`], so a path
//! containing spaces or non-ASCII characters maps to one percent-encoded
//! uri no matter whether it came from the filesystem or from an editor.

use smol_str::SmolStr;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Uri of a tracked file. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileUri(SmolStr);

impl FileUri {
    /// Wrap a uri, normalizing its encoding. Text that is not a valid url is
    /// kept verbatim as an opaque document identifier.
    pub fn new(uri: impl AsRef<str>) -> Self {
        let raw = uri.as_ref();
        match Url::parse(raw) {
            Ok(url) => Self::from(url),
            Err(_) => Self(SmolStr::new(raw)),
        }
    }

    /// Build a `file://` uri from a filesystem path; relative paths are made
    /// absolute against the current directory first
    pub fn from_path(path: &Path) -> Self {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        match Url::from_file_path(&absolute) {
            Ok(url) => Self::from(url),
            Err(()) => Self(SmolStr::new(absolute.to_string_lossy())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_url(&self) -> Option<Url> {
        Url::parse(&self.0).ok()
    }

    /// Filesystem path for `file://` uris, percent-decoded
    pub fn to_path(&self) -> Option<PathBuf> {
        self.to_url()?.to_file_path().ok()
    }

    /// True when the uri names a file with the given extension (without dot)
    pub fn has_extension(&self, extension: &str) -> bool {
        let name = match self.to_url() {
            Some(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .map(String::from),
            None => self.0.rsplit('/').next().map(String::from),
        };
        name.and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

impl fmt::Display for FileUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileUri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Url> for FileUri {
    fn from(url: Url) -> Self {
        Self(SmolStr::new(url.as_str()))
    }
}
