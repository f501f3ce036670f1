//! Error types for KML/KMZ document building

use thiserror::Error;

/// Errors that can occur while building or packaging an overlay document
#[derive(Debug, Error)]
pub enum BuildError {
    /// The document references bundled local assets (label badges) and can
    /// only be exported as KMZ. Recoverable: build with [`OutputFormat::Kmz`]
    /// instead.
    ///
    /// [`OutputFormat::Kmz`]: crate::OutputFormat::Kmz
    #[error("document references local assets and must be exported as KMZ")]
    KmzRequired,

    /// KMZ packaging produced an archive with no bytes
    #[error("KMZ packaging produced an empty archive")]
    EmptyArchive,

    /// A bundled resource could not be resolved at packaging time
    #[error("bundled resource missing: {0}")]
    MissingLocalResource(String),

    /// Archive creation failed (wrapped zip/io error)
    #[error("KMZ packaging error: {0}")]
    Packaging(String),
}

/// Result type for build operations
pub type Result<T> = std::result::Result<T, BuildError>;
