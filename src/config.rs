//! Workspace tuning parsed from environment variables.

use crate::consts::{CLOSE_RADIUS_PX, EXPORT_FILE_NAME, EXPORT_PIXEL_RATIO, VIEWPORT_PADDING_PX};

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Knobs a host may override without recompiling.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceConfig {
    /// Gap between the container edge and the stage, per side.
    pub viewport_padding: f64,
    /// Output scale for exports (2.0 doubles the stage resolution).
    pub export_pixel_ratio: f64,
    /// Polygon closing distance in pixels.
    pub close_radius: f64,
    /// File name suggested to the download collaborator.
    pub export_file_name: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            viewport_padding: VIEWPORT_PADDING_PX,
            export_pixel_ratio: EXPORT_PIXEL_RATIO,
            close_radius: CLOSE_RADIUS_PX,
            export_file_name: EXPORT_FILE_NAME.to_owned(),
        }
    }
}

impl WorkspaceConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `ROOM_VIEWPORT_PADDING`: default 16
    /// - `ROOM_EXPORT_PIXEL_RATIO`: default 2.0
    /// - `ROOM_CLOSE_RADIUS`: default 15.0
    /// - `ROOM_EXPORT_FILE_NAME`: default `room-design.png`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(v) => Some(v),
            Err(_) => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Unparseable, non-finite, or out-of-range numbers fall back to their
    /// defaults; blank strings count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| parse_f64(&v));

        Self {
            viewport_padding: number("ROOM_VIEWPORT_PADDING")
                .filter(|v| *v >= 0.0)
                .unwrap_or(defaults.viewport_padding),
            export_pixel_ratio: number("ROOM_EXPORT_PIXEL_RATIO")
                .filter(|v| *v > 0.0)
                .unwrap_or(defaults.export_pixel_ratio),
            close_radius: number("ROOM_CLOSE_RADIUS")
                .filter(|v| *v > 0.0)
                .unwrap_or(defaults.close_radius),
            export_file_name: lookup("ROOM_EXPORT_FILE_NAME")
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.export_file_name),
        }
    }
}

fn parse_f64(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}
