/// Sniff the MIME type of image bytes from magic prefixes.
///
/// Recognizes JPEG, PNG and WebP; anything else is reported as PNG, which
/// the service accepts as a safe default.
pub fn sniff(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, 0x50, 0x4e, 0x47]) {
        "image/png"
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_jpeg() {
        assert_eq!(sniff(&[0xff, 0xd8, 0xff, 0xe0, 0x00]), "image/jpeg");
    }

    #[test]
    fn recognizes_png() {
        assert_eq!(sniff(&[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a]), "image/png");
    }

    #[test]
    fn recognizes_webp() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBP");
        assert_eq!(sniff(&bytes), "image/webp");
    }

    #[test]
    fn unknown_defaults_to_png() {
        assert_eq!(sniff(b"GIF89a"), "image/png");
    }
}
