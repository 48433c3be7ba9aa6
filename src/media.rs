//! Servable media targets
//!
//! The set of files this server can return is closed: each variant maps at
//! compile time to a file name inside the media directory, a MIME type and
//! the route it is published under. Nothing taken from a request ever
//! becomes part of a filesystem path.

use std::fmt;
use std::path::{Path, PathBuf};

/// One of the fixed media files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaTarget {
    /// Party video
    Party,
    /// Bling audio
    Bling,
    /// Bird video
    Bird,
}

impl MediaTarget {
    /// Every servable target, in route table order
    pub const ALL: [Self; 3] = [Self::Party, Self::Bling, Self::Bird];

    /// File name relative to the media directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Party => "party.mp4",
            Self::Bling => "bling.mp3",
            Self::Bird => "bird.mp4",
        }
    }

    /// Value sent in the `Content-Type` header
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Party | Self::Bird => "video/mp4",
            Self::Bling => "audio/mpeg",
        }
    }

    /// URL path the target is served under
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Party => "/party.mp4",
            Self::Bling => "/bling.mp3",
            Self::Bird => "/bird.mp4",
        }
    }

    /// Look up the target published under `path` (exact match only)
    #[must_use]
    pub fn from_route(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.route() == path)
    }

    /// Resolve the on-disk location of this target under `media_dir`.
    ///
    /// Relative media directories are anchored at the current working
    /// directory so the returned path is always absolute.
    #[must_use]
    pub fn resolve(self, media_dir: &Path) -> PathBuf {
        let path = media_dir.join(self.file_name());
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().map_or(path.clone(), |cwd| cwd.join(&path))
        }
    }
}

impl fmt::Display for MediaTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Party => "party",
            Self::Bling => "bling",
            Self::Bird => "bird",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(MediaTarget::Party.content_type(), "video/mp4");
        assert_eq!(MediaTarget::Bling.content_type(), "audio/mpeg");
        assert_eq!(MediaTarget::Bird.content_type(), "video/mp4");
    }

    #[test]
    fn test_route_lookup() {
        for target in MediaTarget::ALL {
            assert_eq!(MediaTarget::from_route(target.route()), Some(target));
        }
        assert_eq!(MediaTarget::from_route("/party.mp4/"), None);
        assert_eq!(MediaTarget::from_route("/../party.mp4"), None);
        assert_eq!(MediaTarget::from_route("/"), None);
    }

    #[test]
    fn test_resolve_is_absolute() {
        let path = MediaTarget::Bling.resolve(Path::new("client"));
        assert!(path.is_absolute());
        assert!(path.ends_with("client/bling.mp3"));

        let path = MediaTarget::Bird.resolve(Path::new("/srv/media"));
        assert_eq!(path, PathBuf::from("/srv/media/bird.mp4"));
    }
}
