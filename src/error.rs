//! Error types for QR generation, logo handling and export.
//!
//! The `Display` text of each variant is the message shown to the user, so a
//! host can put `err.to_string()` straight into its message area.

use thiserror::Error;

/// Result type alias for session and rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the renderer and the session controller.
#[derive(Error, Debug)]
pub enum Error {
    /// Generate was requested with blank text.
    #[error("Por favor, ingresa un texto o URL para el código QR.")]
    EmptyText,

    /// The selected file was not declared as `image/png`.
    #[error("Por favor, sube un archivo PNG válido.")]
    NotPng,

    /// The file claimed to be a PNG but could not be decoded.
    #[error("Error al cargar la imagen. Asegúrate de que sea un PNG válido.")]
    LogoDecode(String),

    /// The module grid provider rejected the input.
    #[error("Error al generar el código QR: {0}")]
    Encoding(String),

    /// Export was requested before anything was generated.
    #[error("Primero debes generar un código QR.")]
    NothingToExport,

    /// PNG encoding or delivery of the exported file failed.
    #[error("Error al descargar el código QR: {0}")]
    Export(String),

    /// Render configuration cannot produce a surface.
    #[error("Configuración no válida: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true for failures caused by rejected user input, as opposed to
    /// failures while processing accepted input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyText | Self::NotPng | Self::NothingToExport)
    }
}
