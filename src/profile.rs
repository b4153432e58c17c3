//! Serializable session profile for saving settings and talking to hosts.
//!
//! A [`SessionProfile`] captures the user-adjustable settings of a
//! [`QrSession`](crate::QrSession) in a JSON-friendly format. The logo itself
//! is not part of the profile.
//!
//! # Example
//!
//! ```
//! use qrlogo_renderer::{Configurable, QrSession, SessionProfile};
//!
//! let profile = SessionProfile::from_json(r#"{ "text": "hola", "canvasSize": 400 }"#).unwrap();
//!
//! let mut session = QrSession::in_memory();
//! session.apply_profile(&profile).unwrap();
//! assert_eq!(session.config().canvas_size, 400);
//!
//! let json = session.export_profile().to_json().unwrap();
//! assert!(json.contains("\"canvasSize\":400"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compositor::{DEFAULT_CANVAS_SIZE, DEFAULT_LOGO_PERCENT, DEFAULT_MARGIN, RenderColors};
use crate::error::Result;
use crate::grid::ErrorCorrection;

// ============================================================================
// Settings
// ============================================================================

/// Serializable colour settings as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct ColorSettings {
    pub dark: String,
    pub light: String,
    /// Colour of the dashed border shown around the logo in previews.
    pub border: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        (&RenderColors::default()).into()
    }
}

impl ColorSettings {
    /// Parses the hex strings into render colours.
    pub fn to_render_colors(&self) -> Result<RenderColors> {
        RenderColors::from_hex(&self.dark, &self.light, &self.border)
    }
}

impl From<&RenderColors> for ColorSettings {
    fn from(colors: &RenderColors) -> Self {
        Self {
            dark: RenderColors::to_hex(colors.dark),
            light: RenderColors::to_hex(colors.light),
            border: RenderColors::to_hex(colors.border),
        }
    }
}

/// Serializable version of [`ErrorCorrection`], using the single-letter QR
/// level names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub enum SerializableErrorCorrection {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<ErrorCorrection> for SerializableErrorCorrection {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => Self::L,
            ErrorCorrection::Medium => Self::M,
            ErrorCorrection::Quartile => Self::Q,
            ErrorCorrection::High => Self::H,
        }
    }
}

impl From<SerializableErrorCorrection> for ErrorCorrection {
    fn from(level: SerializableErrorCorrection) -> Self {
        match level {
            SerializableErrorCorrection::L => Self::Low,
            SerializableErrorCorrection::M => Self::Medium,
            SerializableErrorCorrection::Q => Self::Quartile,
            SerializableErrorCorrection::H => Self::High,
        }
    }
}

fn default_canvas_size() -> u32 {
    DEFAULT_CANVAS_SIZE
}

fn default_margin() -> u32 {
    DEFAULT_MARGIN
}

fn default_logo_percent() -> f32 {
    DEFAULT_LOGO_PERCENT
}

// ============================================================================
// SessionProfile
// ============================================================================

/// All user-adjustable session settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "text": "https://example.com",
///   "canvasSize": 300,
///   "margin": 2,
///   "logoSizePercent": 20.0,
///   "colors": { "dark": "#000000", "light": "#ffffff", "border": "#4a90e2" },
///   "errorCorrection": "H"
/// }
/// ```
///
/// Every field is optional when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "tsify", derive(tsify_next::Tsify))]
pub struct SessionProfile {
    #[serde(default)]
    pub text: String,

    /// Requested surface side in pixels.
    #[serde(default = "default_canvas_size")]
    pub canvas_size: u32,

    /// Quiet zone in modules.
    #[serde(default = "default_margin")]
    pub margin: u32,

    #[serde(default = "default_logo_percent")]
    pub logo_size_percent: f32,

    /// `None` means the default palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSettings>,

    #[serde(default)]
    pub error_correction: SerializableErrorCorrection,
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            text: String::new(),
            canvas_size: DEFAULT_CANVAS_SIZE,
            margin: DEFAULT_MARGIN,
            logo_size_percent: DEFAULT_LOGO_PERCENT,
            colors: None,
            error_correction: SerializableErrorCorrection::default(),
        }
    }
}

impl SessionProfile {
    /// Creates a profile with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a profile from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(feature = "tsify")]
impl SessionProfile {
    /// Converts the profile to a JavaScript object.
    pub fn to_js(&self) -> std::result::Result<wasm_bindgen::JsValue, serde_wasm_bindgen::Error> {
        serde_wasm_bindgen::to_value(self)
    }

    /// Reads a profile from a JavaScript object.
    pub fn from_js(
        value: wasm_bindgen::JsValue,
    ) -> std::result::Result<Self, serde_wasm_bindgen::Error> {
        serde_wasm_bindgen::from_value(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
