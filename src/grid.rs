//! Module grids and the providers that produce them.
//!
//! A [`ModuleGrid`] is the square dark/light matrix of a QR symbol. Producing
//! one (data encoding, Reed-Solomon, masking) is delegated to a
//! [`ModuleGridProvider`]; [`QrCodeProvider`] is the default backed by the
//! `qrcode` crate.

use qrcode::{Color, EcLevel, QrCode};

use crate::error::{Error, Result};

/// Error correction level requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// ~7% recovery.
    Low,
    /// ~15% recovery.
    Medium,
    /// ~25% recovery.
    Quartile,
    /// ~30% recovery. Needed when a logo covers the centre of the symbol.
    #[default]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

// ============================================================================
// ModuleGrid
// ============================================================================

/// An immutable square matrix of QR modules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    module_count: usize,
    modules: Vec<bool>,
}

impl ModuleGrid {
    /// Builds a grid from row-major module values.
    ///
    /// Returns `None` if `modules` is empty or not a perfect square.
    pub fn from_modules(modules: Vec<bool>) -> Option<Self> {
        let module_count = (modules.len() as f64).sqrt() as usize;
        if module_count == 0 || module_count * module_count != modules.len() {
            return None;
        }
        Some(Self { module_count, modules })
    }

    /// Builds a grid of side `module_count` by evaluating `f(row, col)`.
    pub fn from_fn(module_count: usize, f: impl Fn(usize, usize) -> bool) -> Option<Self> {
        let modules = (0..module_count * module_count)
            .map(|i| f(i / module_count, i % module_count))
            .collect();
        Self::from_modules(modules)
    }

    /// Number of modules along one side.
    pub fn module_count(&self) -> usize {
        self.module_count
    }

    /// Returns true if the module at `(row, col)` is dark.
    ///
    /// Out-of-range coordinates are reported as light.
    pub fn is_dark(&self, row: usize, col: usize) -> bool {
        if row >= self.module_count || col >= self.module_count {
            return false;
        }
        self.modules[row * self.module_count + col]
    }

    /// Iterates over the `(row, col)` coordinates of every dark module.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.module_count;
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, dark)| **dark)
            .map(move |(i, _)| (i / n, i % n))
    }
}

// ============================================================================
// Providers
// ============================================================================

/// Something that can turn text into a QR module grid.
pub trait ModuleGridProvider {
    /// Encodes `text` at the given error correction level.
    ///
    /// Capacity overflows and similar failures are reported as
    /// [`Error::Encoding`].
    fn encode(&self, text: &str, level: ErrorCorrection) -> Result<ModuleGrid>;
}

/// [`ModuleGridProvider`] backed by the `qrcode` crate.
///
/// Picks the smallest symbol version that fits the data.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrCodeProvider;

impl ModuleGridProvider for QrCodeProvider {
    fn encode(&self, text: &str, level: ErrorCorrection) -> Result<ModuleGrid> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), level.into())
            .map_err(|e| Error::Encoding(e.to_string()))?;

        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        let grid = ModuleGrid::from_modules(modules)
            .ok_or_else(|| Error::Encoding("symbol is not square".into()))?;

        log::debug!(
            "encoded {} bytes into a {}x{} grid",
            text.len(),
            grid.module_count(),
            grid.module_count()
        );
        Ok(grid)
    }
}
