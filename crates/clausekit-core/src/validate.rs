//! Candidate file metadata and the type/size acceptance policy.
//!
//! Validation is a pure function of the file's declared MIME type and byte
//! size. Nothing here opens the file's contents.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest accepted upload: 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Extensions offered by the file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

const FALLBACK_MIME: &str = "application/octet-stream";

/// A file the user has picked or dropped, not yet uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub byte_size: u64,
    pub mime_type: String,
    /// Where the contents live on disk, when the file came from a path.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("cannot read {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, byte_size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            byte_size,
            mime_type: mime_type.into(),
            path: None,
        }
    }

    /// Build a candidate from a file on disk.
    ///
    /// The MIME type comes from the extension; unrecognised extensions get
    /// `application/octet-stream`, which [`validate`] rejects.
    pub fn from_path(path: &Path) -> Result<Self, CandidateError> {
        let meta = std::fs::metadata(path).map_err(|source| CandidateError::Metadata {
            path: path.to_path_buf(),
            source,
        })?;
        if !meta.is_file() {
            return Err(CandidateError::NotAFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            byte_size: meta.len(),
            mime_type: mime_for_path(path).to_string(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Size in MiB with two decimals, e.g. `"2.00 MB"`.
    pub fn size_mib(&self) -> String {
        format!("{:.2} MB", self.byte_size as f64 / 1024.0 / 1024.0)
    }
}

/// Accepted document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Why a candidate was refused. The display string is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please upload a PDF or image file (PNG, JPG, JPEG)")]
    UnsupportedType { mime_type: String },
    #[error("File size must be less than 50MB")]
    SizeExceeded { byte_size: u64 },
}

/// Check a candidate against the type and size policy.
///
/// Type is checked before size, so a file failing both reports
/// [`Rejection::UnsupportedType`].
pub fn validate(file: &CandidateFile) -> Result<DocumentKind, Rejection> {
    let kind =
        DocumentKind::from_mime(&file.mime_type).ok_or_else(|| Rejection::UnsupportedType {
            mime_type: file.mime_type.clone(),
        })?;
    if file.byte_size > MAX_UPLOAD_BYTES {
        return Err(Rejection::SizeExceeded {
            byte_size: file.byte_size,
        });
    }
    Ok(kind)
}

/// Whether the picker would offer this path.
pub fn accepts_extension(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

fn mime_for_path(path: &Path) -> &'static str {
    match extension(path).as_deref() {
        Some("pdf") => DocumentKind::Pdf.mime_type(),
        Some("png") => DocumentKind::Png.mime_type(),
        Some("jpg") | Some("jpeg") => DocumentKind::Jpeg.mime_type(),
        _ => FALLBACK_MIME,
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}
