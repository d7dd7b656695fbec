//! Error types and handling for modsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Errors fall into three groups the engine treats differently:
//! - pass-fatal: settings store or catalog source unusable
//! - per-item: one catalog item failed, the pass continues
//! - cleanup: logged, never escalated

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for modsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    // Catalog source errors
    #[error("Subscription source unavailable: {reason}")]
    #[diagnostic(
        code(modsync::catalog::source_unavailable),
        help("The subscribed item list could not be enumerated; nothing can be reconciled")
    )]
    SourceUnavailable { reason: String },

    #[error("Catalog file not found: {path}")]
    #[diagnostic(code(modsync::catalog::not_found))]
    CatalogNotFound { path: String },

    #[error("Failed to parse catalog file: {path}")]
    #[diagnostic(code(modsync::catalog::parse_failed))]
    CatalogParseFailed { path: String, reason: String },

    // Archive errors
    #[error("Archive nested more than {limit} levels deep")]
    #[diagnostic(
        code(modsync::archive::nesting_exceeded),
        help("Re-pack the payload so the content is at most {limit} archives deep")
    )]
    NestingExceeded { limit: u32 },

    #[error("Failed to extract archive: {archive}: {reason}")]
    #[diagnostic(code(modsync::archive::extraction_failed))]
    ExtractionFailed { archive: String, reason: String },

    #[error("Archive entry escapes the extraction directory: {entry}")]
    #[diagnostic(
        code(modsync::archive::unsafe_path),
        help("Archive entries must not contain absolute paths or parent-directory segments")
    )]
    UnsafeArchivePath { entry: String },

    // Manifest errors
    #[error("Failed to parse manifest: {path}")]
    #[diagnostic(code(modsync::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Manifest for '{display_name}' has an empty unique name")]
    #[diagnostic(
        code(modsync::manifest::empty_unique_name),
        help("The unique name is the installation directory name and cannot be empty")
    )]
    EmptyUniqueName { display_name: String },

    #[error("Manifest unique name is not a valid directory name: {name}")]
    #[diagnostic(code(modsync::manifest::invalid_unique_name))]
    InvalidUniqueName { name: String },

    // Install record errors
    #[error("Failed to write install record: {path}")]
    #[diagnostic(code(modsync::record::write_failed))]
    RecordWriteFailed { path: String, reason: String },

    // Settings errors
    #[error("Failed to write settings file: {path}")]
    #[diagnostic(
        code(modsync::settings::write_failed),
        help("Check that the data directory exists and is writable")
    )]
    SettingsWriteFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(modsync::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(modsync::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(modsync::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SyncError>;
