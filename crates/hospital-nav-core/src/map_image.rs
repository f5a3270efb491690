use std::io::Cursor;

use image::{ImageFormat, ImageReader};

/// Which display slot an image is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    /// Static map of the whole graph.
    GraphMap,
    /// Backend-rendered overlay of one path.
    PathOverlay,
}

/// Raw image payload as received from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl BinaryImage {
    /// Wrap a body with the content type the server declared, if any.
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// Raw encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared `Content-Type` header.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length body.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Image format, from the declared content type or else sniffed from
    /// the leading bytes.
    pub fn format(&self) -> Option<ImageFormat> {
        self.content_type
            .as_deref()
            .and_then(|ct| ImageFormat::from_mime_type(ct.split(';').next().unwrap_or(ct).trim()))
            .or_else(|| image::guess_format(&self.bytes).ok())
    }

    /// File extension for saving the payload, `bin` when unknown.
    pub fn extension(&self) -> &'static str {
        self.format()
            .and_then(|f| f.extensions_str().first().copied())
            .unwrap_or("bin")
    }

    /// Pixel dimensions read from the image header, if the format is
    /// decodable.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()
    }
}
