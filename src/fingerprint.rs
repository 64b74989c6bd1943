//! Image change detection.
//!
//! A [`Fingerprint`] is a SHA-256 digest of an image's dimensions and raw
//! RGBA bytes.  It only answers "is this the same image as last cycle?" and
//! is not used for anything security-related.

use std::fmt;

use sha2::{Digest, Sha256};

/// Digest of a captured image's raw content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 12 hex digits, for log lines.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Compute the fingerprint of a `width` × `height` image whose pixel data is
/// `bytes`.
///
/// Dimensions are hashed ahead of the pixels so two images with the same
/// byte buffer but a different shape do not collide.
pub fn fingerprint(width: usize, height: usize, bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update((width as u64).to_le_bytes());
    hasher.update((height as u64).to_le_bytes());
    hasher.update(bytes);
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&hasher.finalize());
    Fingerprint(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(width: usize, height: usize) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| if i % 2 == 0 { [0, 0, 0, 255] } else { [255, 255, 255, 255] })
            .collect()
    }

    #[test]
    fn identical_bytes_give_identical_digest() {
        let a = checker(8, 8);
        let b = a.clone();
        assert_eq!(fingerprint(8, 8, &a), fingerprint(8, 8, &b));
    }

    #[test]
    fn single_pixel_change_changes_digest() {
        let a = checker(8, 8);
        let mut b = a.clone();
        b[17] ^= 0x01;
        assert_ne!(fingerprint(8, 8, &a), fingerprint(8, 8, &b));
    }

    #[test]
    fn shape_is_part_of_the_digest() {
        let bytes = checker(4, 4);
        assert_ne!(fingerprint(4, 4, &bytes), fingerprint(2, 8, &bytes));
    }

    #[test]
    fn display_is_full_hex() {
        let fp = fingerprint(1, 1, &[1, 2, 3, 4]);
        let s = fp.to_string();
        assert_eq!(s.len(), 64);
        assert!(s.starts_with(&fp.short()));
    }
}
