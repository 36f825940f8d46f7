//! Upload and input hardening.

use std::path::Path;

/// Longest accepted upload name, in characters
pub const MAX_FILENAME_LENGTH: usize = 255;
pub const MIN_FILE_CONTENT_SIZE: usize = 1;

/// Extensions accepted for uploaded sequence files
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["txt", "fasta", "fa", "seq"];

/// Why an upload was refused
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File name is longer than {MAX_FILENAME_LENGTH} characters")]
    FilenameTooLong,
    #[error("File name contains a path or unsupported characters")]
    InvalidFilename,
    #[error("File name is empty")]
    EmptyFilename,
    #[error("File type not allowed (expected one of: txt, fasta, fa, seq)")]
    DisallowedExtension,
    #[error("File is not a text sequence file")]
    InvalidFileContent,
    #[error("Content exceeds maximum size of {limit} bytes")]
    ContentTooLarge { limit: usize },
}

fn is_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ')
}

/// Sanitize the name of an uploaded sequence file.
///
/// Names with path separators, `..` or control characters are refused. Other
/// characters outside `[A-Za-z0-9._- ]` are dropped. A leading dot is only
/// accepted for a bare sequence extension such as `.fasta`.
///
/// # Errors
///
/// Returns `ValidationError::EmptyFilename`, `ValidationError::FilenameTooLong`
/// or `ValidationError::InvalidFilename`.
pub fn validate_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.trim().is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::FilenameTooLong);
    }

    let has_path = filename.contains("..") || filename.contains(['/', '\\']);
    if has_path || filename.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFilename);
    }

    let sanitized: String = filename.chars().filter(|c| is_filename_char(*c)).collect();
    match sanitized.trim() {
        "" => Err(ValidationError::InvalidFilename),
        name if name.starts_with('.') && !has_known_extension(name) => {
            Err(ValidationError::InvalidFilename)
        }
        _ => Ok(sanitized),
    }
}

/// Check if the filename ends in one of `ALLOWED_EXTENSIONS` (case-insensitive)
#[must_use]
pub fn has_known_extension(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();

    // `.fasta` has no stem, so Path::extension() would miss it
    if let Some(bare) = lower.strip_prefix('.') {
        if ALLOWED_EXTENSIONS.contains(&bare) {
            return true;
        }
    }

    Path::new(&lower)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Validate that uploaded content is non-empty UTF-8 text
///
/// Inputs over 100 bytes may contain at most 5% non-printable bytes.
///
/// # Errors
///
/// Returns `ValidationError::InvalidFileContent` if the content is empty,
/// looks binary, or fails UTF-8 validation.
pub fn validate_file_content(content: &[u8]) -> Result<(), ValidationError> {
    if content.len() < MIN_FILE_CONTENT_SIZE {
        return Err(ValidationError::InvalidFileContent);
    }

    let non_printable_count = content
        .iter()
        .filter(|&&b| b < 9 || (b > 13 && b < 32) || b == 127)
        .count();

    if content.len() > 100 && non_printable_count > content.len() / 20 {
        return Err(ValidationError::InvalidFileContent);
    }

    if std::str::from_utf8(content).is_err() {
        return Err(ValidationError::InvalidFileContent);
    }

    Ok(())
}

/// Reject content larger than `limit` bytes.
///
/// # Errors
///
/// Returns `ValidationError::ContentTooLarge` when `len > limit`.
pub fn check_content_length(len: usize, limit: usize) -> Result<(), ValidationError> {
    if len > limit {
        return Err(ValidationError::ContentTooLarge { limit });
    }
    Ok(())
}

/// Full upload validation: size, filename, extension and content.
///
/// Returns the sanitized filename (if one was provided) and the content as text.
///
/// # Errors
///
/// Returns a `ValidationError` for the first check that fails.
pub fn validate_upload<'a>(
    filename: Option<&str>,
    content: &'a [u8],
    max_size: usize,
) -> Result<(Option<String>, &'a str), ValidationError> {
    check_content_length(content.len(), max_size)?;

    let validated_filename = match filename {
        Some(name) => {
            let sanitized = validate_filename(name)?;
            if !has_known_extension(&sanitized) {
                return Err(ValidationError::DisallowedExtension);
            }
            Some(sanitized)
        }
        None => None,
    };

    validate_file_content(content)?;
    let text = std::str::from_utf8(content).map_err(|_| ValidationError::InvalidFileContent)?;

    Ok((validated_filename, text))
}
