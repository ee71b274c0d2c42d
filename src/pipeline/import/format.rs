/// File formats accepted by the upload form (`.pdf,.jpg,.jpeg,.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Pdf,
    Jpeg,
    Png,
}

impl UploadFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    /// Extension given to the staged file handed to the OCR script.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Detect file format from magic bytes (NOT file extensions).
pub fn detect_format(bytes: &[u8]) -> Option<UploadFormat> {
    match bytes {
        // PDF: starts with %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => Some(UploadFormat::Pdf),
        // JPEG: starts with FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(UploadFormat::Jpeg),
        // PNG: full 8-byte signature
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some(UploadFormat::Png),
        _ => None,
    }
}

/// Keep only the final path segment of a client-supplied file name.
pub fn sanitize_file_name(original: &str) -> String {
    let name = original
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let clean: String = name
        .chars()
        .filter(|c| !c.is_control())
        .take(255)
        .collect();

    if clean.trim().is_empty() {
        "document".to_string()
    } else {
        clean
    }
}
