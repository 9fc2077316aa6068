//! Uploaded plant photos and their format checks.

use crate::error::IdentifyError;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const JPEG_MAGIC: &[u8] = &[0xff, 0xd8, 0xff];

/// An image selected for identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Build an upload from raw file contents, detecting the content type
    /// from the leading bytes and then the file extension.
    pub fn from_file_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = sniff_content_type(&bytes, &file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Reject anything that is not JPEG or PNG.
    pub fn validate(&self) -> Result<(), IdentifyError> {
        if is_supported_content_type(&self.content_type) {
            Ok(())
        } else {
            Err(IdentifyError::UnsupportedFormat(self.content_type.clone()))
        }
    }
}

/// True for `image/jpeg` and `image/png`, ignoring case and parameters.
pub fn is_supported_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    matches!(essence.as_str(), "image/jpeg" | "image/png")
}

fn sniff_content_type(bytes: &[u8], file_name: &str) -> &'static str {
    if bytes.starts_with(PNG_MAGIC) {
        return "image/png";
    }
    if bytes.starts_with(JPEG_MAGIC) {
        return "image/jpeg";
    }

    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
