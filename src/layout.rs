//! Responsive layout configuration for the pointer artwork.
//!
//! The values here are recomputed whenever the viewport changes and passed
//! explicitly to whoever needs them; nothing is kept in global state.

use crate::config::{MOBILE_BREAKPOINT_PX, ROULETTE_SIZE_DESKTOP_PX, ROULETTE_SIZE_MOBILE_PX};
use crate::precision::{
    calculate_precise_ratio, to_css_pixel, to_half_pixel, to_high_precision, to_integer_pixel,
    PrecisionError, DEFAULT_PRECISION,
};

/// Pointer width relative to the wheel diameter.
pub const POINTER_WIDTH_RATIO: f64 = 0.7;
/// Width of the source pointer artwork in pixels.
pub const ARTWORK_WIDTH_PX: f64 = 1517.0;
/// Distance from the artwork's rotation axis to the fingertip, in artwork pixels.
pub const ARTWORK_TIP_DISTANCE_PX: f64 = 838.6;

// CSS custom property names
pub const CSS_POINTER_WIDTH: &str = "--bottle-opener-width";
pub const CSS_PALETTE_SIZE: &str = "--palette-size";
pub const CSS_PALETTE_RADIUS: &str = "--palette-radius";
pub const CSS_SCALE_RATIO: &str = "--scale-ratio";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Mobile,
    Desktop,
}

impl DeviceType {
    pub fn from_viewport_width(width: f64) -> Self {
        if width >= MOBILE_BREAKPOINT_PX {
            DeviceType::Desktop
        } else {
            DeviceType::Mobile
        }
    }

    /// Rendered wheel diameter for this device class.
    pub fn roulette_size(self) -> f64 {
        match self {
            DeviceType::Mobile => ROULETTE_SIZE_MOBILE_PX,
            DeviceType::Desktop => ROULETTE_SIZE_DESKTOP_PX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteConfig {
    pub pointer_width: f64,
    pub palette_size: f64,
    pub palette_radius: f64,
    pub scale_ratio: f64,
}

impl PaletteConfig {
    pub fn for_device(device: DeviceType) -> Result<Self, PrecisionError> {
        Self::for_roulette_size(device.roulette_size())
    }

    /// Derive pixel-snapped pointer and palette dimensions from a wheel diameter.
    pub fn for_roulette_size(roulette_size: f64) -> Result<Self, PrecisionError> {
        let pointer_width = to_half_pixel(roulette_size * POINTER_WIDTH_RATIO);
        let scale_ratio = calculate_precise_ratio(pointer_width, ARTWORK_WIDTH_PX, DEFAULT_PRECISION)?;
        let palette_radius = to_half_pixel(ARTWORK_TIP_DISTANCE_PX * scale_ratio);
        let palette_size = to_integer_pixel(palette_radius * 2.0);
        Ok(Self {
            pointer_width,
            palette_size,
            palette_radius,
            scale_ratio,
        })
    }

    /// CSS custom properties as `(name, value)` pairs for the document root.
    pub fn css_variables(&self) -> [(&'static str, String); 4] {
        [
            (CSS_POINTER_WIDTH, to_css_pixel(self.pointer_width)),
            (CSS_PALETTE_SIZE, to_css_pixel(self.palette_size)),
            (CSS_PALETTE_RADIUS, to_css_pixel(self.palette_radius)),
            (
                CSS_SCALE_RATIO,
                to_high_precision(self.scale_ratio, DEFAULT_PRECISION).to_string(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_breakpoint() {
        assert_eq!(DeviceType::from_viewport_width(375.0), DeviceType::Mobile);
        assert_eq!(DeviceType::from_viewport_width(767.9), DeviceType::Mobile);
        assert_eq!(DeviceType::from_viewport_width(768.0), DeviceType::Desktop);
    }

    #[test]
    fn test_mobile_palette() {
        let config = PaletteConfig::for_device(DeviceType::Mobile).unwrap();
        assert_eq!(config.pointer_width, 224.0);
        assert_eq!(config.scale_ratio, 0.14766);
        assert_eq!(config.palette_radius, 124.0);
        assert_eq!(config.palette_size, 248.0);
    }

    #[test]
    fn test_desktop_palette() {
        let config = PaletteConfig::for_device(DeviceType::Desktop).unwrap();
        // 384 * 0.7 = 268.8 snaps to 269
        assert_eq!(config.pointer_width, 269.0);
        assert_eq!(config.scale_ratio, 0.177324);
        assert_eq!(config.palette_radius, 148.5);
        assert_eq!(config.palette_size, 297.0);
    }

    #[test]
    fn test_palette_fits_inside_wheel() {
        for device in [DeviceType::Mobile, DeviceType::Desktop] {
            let config = PaletteConfig::for_device(device).unwrap();
            assert!(config.palette_size < device.roulette_size());
        }
    }

    #[test]
    fn test_css_variables() {
        let config = PaletteConfig::for_device(DeviceType::Desktop).unwrap();
        let vars = config.css_variables();
        assert_eq!(vars[0], (CSS_POINTER_WIDTH, "269px".to_string()));
        assert_eq!(vars[1], (CSS_PALETTE_SIZE, "297px".to_string()));
        assert_eq!(vars[2], (CSS_PALETTE_RADIUS, "148.5px".to_string()));
        assert_eq!(vars[3], (CSS_SCALE_RATIO, "0.177324".to_string()));
    }
}
