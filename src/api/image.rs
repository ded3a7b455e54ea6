use std::fs;
use std::path::Path;

use crate::api::error::ApiError;

/// An image read from disk, ready to be sent as a multipart file part.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Read `path` and detect its format from the magic bytes.
    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = fs::read(path).map_err(|source| ApiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Self::from_bytes(file_name, bytes).map_err(|reason| ApiError::InvalidImage {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("file is empty".to_string());
        }
        let format = image::guess_format(&bytes).map_err(|e| e.to_string())?;
        Ok(Self {
            file_name: file_name.into(),
            mime_type: format.to_mime_type(),
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
    const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn detects_png_from_magic_bytes() {
        let upload = ImageUpload::from_bytes("fish.png", PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(upload.mime_type, "image/png");
    }

    #[test]
    fn detects_jpeg_regardless_of_extension() {
        let upload = ImageUpload::from_bytes("fish.bin", JPEG_MAGIC.to_vec()).unwrap();
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn rejects_empty_and_non_image_bytes() {
        assert!(ImageUpload::from_bytes("a", Vec::new()).is_err());
        assert!(ImageUpload::from_bytes("a.txt", b"hello world".to_vec()).is_err());
    }

    #[test]
    fn from_path_reports_invalid_image() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an image at all").unwrap();
        let err = ImageUpload::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidImage { .. }));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = ImageUpload::from_path(Path::new("/definitely/not/here.jpg")).unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
