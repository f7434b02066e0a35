//! Editor geometry and behavior settings.
//!
//! The presentation surface owns the real pixel geometry; the core only needs the fixed line
//! height, the average glyph advance (for pointer hit-testing) and the viewport size to size
//! its slot pool. All fields have defaults so partial JSON documents are accepted.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};

/// Geometry and editing settings for one document view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Height of one rendered line in pixels.
    #[serde(default = "default_line_height_px")]
    pub line_height_px: f64,
    /// Horizontal advance of one character in pixels (monospace assumption).
    #[serde(default = "default_char_width_px")]
    pub char_width_px: f64,
    /// Height of the scrollable viewport in pixels.
    #[serde(default = "default_viewport_height_px")]
    pub viewport_height_px: f64,
    /// Width of the scrollable viewport in pixels.
    #[serde(default = "default_viewport_width_px")]
    pub viewport_width_px: f64,
    /// Number of spaces inserted by the Tab key (and removed as a unit by Backspace).
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,
    /// Rows kept between the cursor and the bottom edge when scrolling it into view.
    #[serde(default = "default_scroll_margin_rows")]
    pub scroll_margin_rows: usize,
    /// Backspace after a full run of `tab_width` spaces removes the whole run.
    #[serde(default)]
    pub soft_tab_backspace: bool,
}

fn default_line_height_px() -> f64 {
    16.0
}

fn default_char_width_px() -> f64 {
    7.8
}

fn default_viewport_height_px() -> f64 {
    720.0
}

fn default_viewport_width_px() -> f64 {
    1280.0
}

fn default_tab_width() -> usize {
    4
}

fn default_scroll_margin_rows() -> usize {
    2
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_height_px: default_line_height_px(),
            char_width_px: default_char_width_px(),
            viewport_height_px: default_viewport_height_px(),
            viewport_width_px: default_viewport_width_px(),
            tab_width: default_tab_width(),
            scroll_margin_rows: default_scroll_margin_rows(),
            soft_tab_backspace: false,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the viewport size.
    pub fn with_viewport(mut self, width_px: f64, height_px: f64) -> Self {
        self.viewport_width_px = width_px;
        self.viewport_height_px = height_px;
        self
    }

    /// Replace the line height.
    pub fn with_line_height(mut self, line_height_px: f64) -> Self {
        self.line_height_px = line_height_px;
        self
    }

    /// Replace the Tab width.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    /// Check that the geometry can size a slot pool.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("line_height_px", self.line_height_px),
            ("char_width_px", self.char_width_px),
            ("viewport_height_px", self.viewport_height_px),
            ("viewport_width_px", self.viewport_width_px),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                tracing::warn!(field = name, value, "rejecting editor configuration");
                return Err(EditorError::InvalidConfig(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        if self.tab_width == 0 {
            tracing::warn!(field = "tab_width", "rejecting editor configuration");
            return Err(EditorError::InvalidConfig(
                "tab_width must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of render slots needed to cover the viewport: `ceil(height / line_height)`.
    pub fn slot_count(&self) -> usize {
        ((self.viewport_height_px / self.line_height_px).ceil() as usize).max(1)
    }

    /// Number of rows that fit fully inside the viewport: `floor(height / line_height)`.
    pub fn visible_rows(&self) -> usize {
        ((self.viewport_height_px / self.line_height_px).floor() as usize).max(1)
    }
}
