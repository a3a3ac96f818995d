//! Validation helpers for ingestion

use crate::domain::DomainError;

use super::parser::DocumentFormat;

/// Extensions accepted for upload
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "pdf", "docx", "md"];

/// Default upload size limit (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Detect the document format from a filename extension
pub fn detect_format_from_filename(filename: &str) -> Option<DocumentFormat> {
    let (_, ext) = filename.rsplit_once('.')?;

    match ext.to_lowercase().as_str() {
        "txt" => Some(DocumentFormat::PlainText),
        "md" => Some(DocumentFormat::Markdown),
        "pdf" => Some(DocumentFormat::Pdf),
        "docx" => Some(DocumentFormat::Docx),
        _ => None,
    }
}

/// Validate an upload before anything is stored.
///
/// Returns the detected format so callers need not parse the name again.
pub fn validate_file_upload(
    filename: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<DocumentFormat, DomainError> {
    let filename = filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| DomainError::validation("Filename is required"))?;

    let format = detect_format_from_filename(filename).ok_or_else(|| {
        DomainError::validation(format!(
            "File type not supported. Allowed types: {}",
            ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| format!(".{ext}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;

    if size > max_bytes {
        return Err(DomainError::validation(format!(
            "File size exceeds maximum allowed size of {}MB",
            max_bytes / (1024 * 1024)
        )));
    }

    if size == 0 {
        return Err(DomainError::validation("File is empty"));
    }

    Ok(format)
}

/// Which stored document an index request refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    /// Storage key returned by an upload
    FilePath(String),
    /// Original filename of an uploaded file
    Filename(String),
}

impl IndexTarget {
    /// Exactly one of `file_path` and `filename` must be given; blank values
    /// count as absent.
    pub fn from_fields(
        file_path: Option<String>,
        filename: Option<String>,
    ) -> Result<Self, DomainError> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        match (non_blank(file_path), non_blank(filename)) {
            (Some(_), Some(_)) => Err(DomainError::validation(
                "Cannot provide both file_path and filename. Provide only one.",
            )),
            (None, None) => Err(DomainError::validation(
                "Must provide either file_path or filename.",
            )),
            (Some(path), None) => Ok(Self::FilePath(path)),
            (None, Some(name)) => Ok(Self::Filename(name)),
        }
    }
}

/// Validate a retrieval depth
pub fn validate_top_k(top_k: usize) -> Result<(), DomainError> {
    if top_k == 0 {
        return Err(DomainError::validation("top_k must be greater than 0"));
    }

    Ok(())
}
