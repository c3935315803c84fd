//! Screen to canvas coordinate mapping
//!
//! The canvas engine owns pan and zoom. The core only asks it to map a
//! screen point at the moment a drop is committed.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Position;

/// A point in screen (client) space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps screen points into canvas space using the live viewport
pub trait CoordinateMapper {
    /// Convert a screen point to a canvas position
    ///
    /// Implementations must read the current pan/zoom state on every call.
    fn screen_to_canvas(&self, point: ScreenPoint) -> Position;
}

/// Mapper for hosts that already deliver canvas coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl CoordinateMapper for IdentityMapper {
    fn screen_to_canvas(&self, point: ScreenPoint) -> Position {
        Position::new(point.x, point.y)
    }
}

/// Pan/zoom state of a canvas element
///
/// `canvas = (screen - origin - translate) / zoom`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Screen position of the canvas element's top-left corner
    #[serde(default)]
    pub origin: ScreenPoint,
    /// Horizontal pan in screen pixels
    #[serde(default)]
    pub translate_x: f64,
    /// Vertical pan in screen pixels
    #[serde(default)]
    pub translate_y: f64,
    /// Zoom factor, strictly positive
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            origin: ScreenPoint::default(),
            translate_x: 0.0,
            translate_y: 0.0,
            zoom: default_zoom(),
        }
    }
}

impl Viewport {
    /// Create a viewport, rejecting zero, negative or non-finite zoom
    pub fn new(origin: ScreenPoint, translate: (f64, f64), zoom: f64) -> Result<Self, ConfigError> {
        let viewport = Self {
            origin,
            translate_x: translate.0,
            translate_y: translate.1,
            zoom,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Zoom must be positive and finite; origin and pan must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ConfigError::InvalidZoom(self.zoom));
        }
        let offsets = [
            self.origin.x,
            self.origin.y,
            self.translate_x,
            self.translate_y,
        ];
        if offsets.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(ConfigError::NonFiniteViewport)
        }
    }

    /// Pan by a screen-space delta
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Change zoom, keeping the canvas point under `anchor` fixed
    pub fn zoom_to(&mut self, zoom: f64, anchor: ScreenPoint) -> Result<(), ConfigError> {
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(ConfigError::InvalidZoom(zoom));
        }
        let fixed = self.screen_to_canvas(anchor);
        let next = Self {
            zoom,
            translate_x: anchor.x - self.origin.x - fixed.x * zoom,
            translate_y: anchor.y - self.origin.y - fixed.y * zoom,
            ..*self
        };
        next.validate()?;
        *self = next;
        Ok(())
    }
}

impl CoordinateMapper for Viewport {
    fn screen_to_canvas(&self, point: ScreenPoint) -> Position {
        Position::new(
            (point.x - self.origin.x - self.translate_x) / self.zoom,
            (point.y - self.origin.y - self.translate_y) / self.zoom,
        )
    }
}
