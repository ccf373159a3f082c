use crate::error::{Result, VisionError};
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Upload formats accepted by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        None
    }
}

/// An uploaded image, already checked to be a PNG or JPEG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputImage {
    data: Vec<u8>,
    format: ImageFormat,
}

impl InputImage {
    /// Validates raw bytes by their magic number.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(VisionError::InvalidImage("uploaded file is empty".into()));
        }
        let format = ImageFormat::from_magic_bytes(&data).ok_or_else(|| {
            VisionError::InvalidImage("only png, jpg and jpeg images are supported".into())
        })?;
        Ok(Self { data, format })
    }

    /// Validates an upload: the file name must carry an allowed extension and
    /// the content must match one of the allowed formats.
    pub fn from_upload(filename: &str, data: Vec<u8>) -> Result<Self> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        if ImageFormat::from_extension(ext).is_none() {
            return Err(VisionError::InvalidImage(format!(
                "{filename}: expected a .png, .jpg or .jpeg file"
            )));
        }
        Self::from_bytes(data)
    }

    /// Decodes a base64 payload as sent by the browser form.
    pub fn from_base64(filename: &str, encoded: &str) -> Result<Self> {
        // FileReader data URLs carry a "data:<mime>;base64," prefix.
        let payload = match encoded.split_once(";base64,") {
            Some((_, rest)) => rest,
            None => encoded,
        };
        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| VisionError::InvalidImage(format!("bad base64 payload: {e}")))?;
        Self::from_upload(filename, data)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.format.mime_type(), self.to_base64())
    }
}
