//! [`CapturedImage`] — one clipboard image, as read in a single poll cycle.

use std::io::Cursor;

use image::error::{ParameterError, ParameterErrorKind};
use image::{ImageError, ImageFormat, RgbaImage};

use crate::fingerprint::{fingerprint, Fingerprint};

/// Raw RGBA8 pixels taken from the clipboard plus their fingerprint.
///
/// Created per poll cycle and dropped once the cycle is done with it.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    width: usize,
    height: usize,
    bytes: Vec<u8>,
    fingerprint: Fingerprint,
}

impl CapturedImage {
    /// Wrap a `width` × `height` RGBA8 buffer.
    ///
    /// Returns `None` when the image is empty or `bytes` is not exactly
    /// `width * height * 4` long; such a payload cannot be decoded.
    pub fn from_rgba(width: usize, height: usize, bytes: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(4)?;
        if expected == 0 || bytes.len() != expected {
            return None;
        }
        let fingerprint = fingerprint(width, height, &bytes);
        Some(Self {
            width,
            height,
            bytes,
            fingerprint,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Encode the pixels as a PNG file in memory.
    pub fn to_png(&self) -> Result<Vec<u8>, ImageError> {
        let img = RgbaImage::from_raw(self.width as u32, self.height as u32, self.bytes.clone())
            .ok_or_else(|| {
                ImageError::Parameter(ParameterError::from_kind(
                    ParameterErrorKind::DimensionMismatch,
                ))
            })?;

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// A single-colour image, for tests.
    #[cfg(test)]
    pub fn solid(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let bytes = rgba.repeat(width * height);
        Self::from_rgba(width, height, bytes).expect("valid solid image")
    }
}
