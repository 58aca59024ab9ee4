//! Leading-byte image format classification.
//!
//! The upload pipeline only ever inspects the first [`SNIFF_WINDOW`] bytes of
//! a payload; the declared `Content-Type` of the multipart part is ignored
//! because clients routinely lie about it. Classification is by magic number,
//! covering the formats an image endpoint is realistically offered.
//!
//! [`SNIFF_WINDOW`]: crate::SNIFF_WINDOW

/// Image formats recognized by [`ImageFormat::sniff`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Classifies a payload by its leading bytes.
    ///
    /// Returns `None` when the input is too short or matches no known image
    /// signature (e.g. plain text).
    #[must_use]
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        // RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
        assert_eq!(ImageFormat::sniff(&data), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn detects_png() {
        let data = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(ImageFormat::sniff(&data), Some(ImageFormat::Png));
    }

    #[test]
    fn detects_gif_and_webp() {
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
        let mut webp = Vec::from(*b"RIFF");
        webp.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(ImageFormat::sniff(&webp), Some(ImageFormat::Webp));
    }

    #[test]
    fn rejects_plain_text_and_short_input() {
        assert_eq!(ImageFormat::sniff(b"hello, world"), None);
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8]), None);
        assert_eq!(ImageFormat::sniff(&[]), None);
    }
}
