//! # Error Types
//!
//! This module defines error types used throughout the mailflow library.
//!
//! Each area has its own enum so that callers can branch on the failure
//! class (missing identity, validation, upstream provider) without string
//! matching. [`MailflowError`] wraps them all for the CLI and server startup.

use thiserror::Error;

/// Errors raised by editor operations on the canvas tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The referenced block no longer exists in the canvas.
    #[error("Block not found: {0}")]
    NotFound(String),

    /// A layer item with this name already exists in the wrapper.
    #[error("Name already in use: {0}")]
    NameTaken(String),

    /// The edit does not apply to the current selection or carries bad values.
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// Nothing is selected.
    #[error("Nothing selected")]
    NoSelection,
}

/// Errors raised by the asset gallery.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No authenticated identity was supplied.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Input rejected before calling the storage provider.
    #[error("{0}")]
    Validation(String),

    /// The storage provider returned an error.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Errors raised by template persistence.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Errors raised by the AI flows.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    /// AI features are switched off in the AI configuration.
    #[error("AI feature disabled: {0}")]
    Disabled(String),

    #[error("DNS lookup failed: {0}")]
    Dns(String),

    /// The language-model API failed or returned an unusable answer.
    #[error("AI provider error: {0}")]
    Provider(String),
}

/// Errors raised while reading or writing the AI configuration documents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while resolving the caller's identity.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Main error type for mailflow operations
#[derive(Debug, Error)]
pub enum MailflowError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Server-level errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
