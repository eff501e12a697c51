use crate::db::file;
use crate::error::CardError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Image encodings accepted for upload, detected from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }
}

/// Saved card images, one file per record named after the record id.
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CardError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CardError::StorageWrite {
            path: dir.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { dir })
    }

    pub fn path_for(&self, id: u64, format: ImageFormat) -> PathBuf {
        self.dir.join(format!("card_{id}.{}", format.extension()))
    }

    /// Write the image for record `id`, replacing any earlier file of the
    /// same name. Returns the path to store on the record.
    pub fn save(&self, id: u64, bytes: &[u8], format: ImageFormat) -> Result<String, CardError> {
        let path = self.path_for(id, format);
        file::write_bytes(&path, bytes)?;
        debug!(id, path = %path.display(), size = bytes.len(), "card image written");
        Ok(path.to_string_lossy().into_owned())
    }

    /// `Ok(None)` when the image is gone from disk.
    pub fn read(&self, image_path: &str) -> Result<Option<Vec<u8>>, CardError> {
        match fs::read(image_path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort cleanup of an image whose record was never saved.
    pub fn discard(&self, image_path: &str) {
        if let Err(e) = file::remove(Path::new(image_path)) {
            warn!(path = image_path, error = %e, "failed to remove orphaned card image");
        }
    }
}
