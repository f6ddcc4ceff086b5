//! Pan and zoom transform.

use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 10.0;

/// Screen = graph * k + (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    /// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.x) / self.k, (sy - self.y) / self.k)
    }

    pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
        (gx * self.k + self.x, gy * self.k + self.y)
    }

    /// Translate by a screen-space offset.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Scale by `factor` around the screen point `(sx, sy)`.
    ///
    /// The graph point under `(sx, sy)` stays under it.
    pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let ratio = k / self.k;
        self.x = sx - (sx - self.x) * ratio;
        self.y = sy - (sy - self.y) * ratio;
        self.k = k;
    }

    /// Back to the identity transform.
    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_through() {
        let view = ViewTransform::default();
        assert_eq!(view.screen_to_graph(12.0, -7.0), (12.0, -7.0));
        assert!(view.is_identity());
    }

    #[test]
    fn test_pan_then_map() {
        let mut view = ViewTransform::default();
        view.pan_by(100.0, 50.0);
        assert_eq!(view.screen_to_graph(100.0, 50.0), (0.0, 0.0));
        assert_eq!(view.graph_to_screen(0.0, 0.0), (100.0, 50.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut view = ViewTransform::default();
        view.pan_by(30.0, 40.0);
        let before = view.screen_to_graph(200.0, 150.0);

        view.zoom_at(200.0, 150.0, 2.5);
        let after = view.screen_to_graph(200.0, 150.0);

        assert_eq!(view.k, 2.5);
        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = ViewTransform::default();
        view.zoom_at(0.0, 0.0, 1000.0);
        assert_eq!(view.k, MAX_ZOOM);
        view.zoom_at(0.0, 0.0, 1e-6);
        assert_eq!(view.k, MIN_ZOOM);
    }

    #[test]
    fn test_bad_zoom_factor_ignored() {
        let mut view = ViewTransform::default();
        view.zoom_at(0.0, 0.0, 0.0);
        view.zoom_at(0.0, 0.0, f64::NAN);
        assert!(view.is_identity());
    }

    #[test]
    fn test_reset() {
        let mut view = ViewTransform::default();
        view.pan_by(5.0, 5.0);
        view.zoom_at(10.0, 10.0, 3.0);
        view.reset();
        assert!(view.is_identity());
    }
}
