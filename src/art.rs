//! Album-art fingerprints and image validity checks.

use std::fmt;

use image::ImageFormat;
use sha2::{Digest, Sha256};

/// SHA-256 of the raw art bytes, hex encoded.
///
/// Two pictures with equal fingerprints are treated as the same artwork.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtFingerprint(String);

impl ArtFingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(bytes)))
    }

    /// First 12 hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for ArtFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `bytes` fully decode as a JPEG or PNG image.
///
/// A picture frame that is present but truncated, corrupt or in another
/// format does not count as usable art.
pub fn is_valid_cover(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return false;
    }
    match image::guess_format(bytes) {
        Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png)) => {
            image::load_from_memory_with_format(bytes, format).is_ok()
        }
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage};

    fn encode(color: [u8; 3], format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_pixel(4, 4, Rgb(color));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    pub fn png(color: [u8; 3]) -> Vec<u8> {
        encode(color, ImageFormat::Png)
    }

    pub fn jpeg(color: [u8; 3]) -> Vec<u8> {
        encode(color, ImageFormat::Jpeg)
    }
}
