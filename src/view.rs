//! Pan and zoom state for an interactive surface.
//!
//! The layout engine never sees this; the hosting page owns a
//! [`ViewTransform`], updates it from pointer input and hands it to
//! [`render_svg`](crate::render::render_svg).

use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 5.0;

/// Pointer travel below which a touch counts as a tap.
pub const TAP_MAX_DISTANCE: f32 = 10.0;
/// Touch duration below which a touch counts as a tap.
pub const TAP_MAX_MILLIS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

impl ViewTransform {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    /// Multiplies the scale by `factor`, keeping the viewport point
    /// `(x, y)` fixed over the same drawing point.
    pub fn zoom_at(&mut self, factor: f32, x: f32, y: f32) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let (cx, cy) = self.to_drawing(x, y);
        self.scale = new_scale;
        self.translate_x = x - cx * new_scale;
        self.translate_y = y - cy * new_scale;
    }

    /// Pinch gesture: scale relative to the scale at gesture start, by the
    /// ratio of finger distances, around the pinch center.
    pub fn pinch_to(
        &mut self,
        initial_scale: f32,
        initial_distance: f32,
        current_distance: f32,
        center: (f32, f32),
    ) {
        if initial_distance <= 0.0 || self.scale <= 0.0 {
            return;
        }
        let target = (initial_scale * current_distance / initial_distance).clamp(MIN_SCALE, MAX_SCALE);
        self.zoom_at(target / self.scale, center.0, center.1);
    }

    /// Maps a viewport point back into drawing coordinates, for hit testing.
    pub fn to_drawing(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.translate_x) / self.scale,
            (y - self.translate_y) / self.scale,
        )
    }

    pub fn to_svg_transform(&self) -> String {
        format!(
            "translate({:.2} {:.2}) scale({:.4})",
            self.translate_x, self.translate_y, self.scale
        )
    }
}

/// Zoom factor for one mouse-wheel notch: scrolling down zooms out.
pub fn wheel_factor(delta_y: f32) -> f32 {
    if delta_y > 0.0 { 0.9 } else { 1.1 }
}

/// A touch that barely moved and ended quickly selects a person instead of
/// panning.
pub fn is_tap(start: (f32, f32), end: (f32, f32), duration_ms: u64) -> bool {
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    (dx * dx + dy * dy).sqrt() < TAP_MAX_DISTANCE && duration_ms < TAP_MAX_MILLIS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let mut view = ViewTransform::default();
        view.pan(30.0, -12.0);
        let before = view.to_drawing(200.0, 150.0);
        view.zoom_at(1.1, 200.0, 150.0);
        let after = view.to_drawing(200.0, 150.0);
        assert!((before.0 - after.0).abs() < 1e-3);
        assert!((before.1 - after.1).abs() < 1e-3);
        assert!((view.scale - 1.1).abs() < 1e-6);
    }

    #[test]
    fn scale_is_clamped() {
        let mut view = ViewTransform::default();
        for _ in 0..100 {
            view.zoom_at(wheel_factor(-1.0), 0.0, 0.0);
        }
        assert_eq!(view.scale, MAX_SCALE);
        for _ in 0..100 {
            view.zoom_at(wheel_factor(1.0), 0.0, 0.0);
        }
        assert_eq!(view.scale, MIN_SCALE);
    }

    #[test]
    fn pinch_scales_from_gesture_start() {
        let mut view = ViewTransform::default();
        view.pinch_to(1.0, 100.0, 200.0, (50.0, 50.0));
        assert!((view.scale - 2.0).abs() < 1e-5);
        view.pinch_to(1.0, 100.0, 50.0, (50.0, 50.0));
        assert!((view.scale - 0.5).abs() < 1e-5);
        let (x, y) = view.to_drawing(50.0, 50.0);
        assert!((x - 50.0).abs() < 1e-3 && (y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn reset_restores_identity() {
        let mut view = ViewTransform::default();
        view.pan(4.0, 4.0);
        view.zoom_at(2.0, 10.0, 10.0);
        assert!(!view.is_identity());
        view.reset();
        assert!(view.is_identity());
    }

    #[test]
    fn tap_requires_small_quick_touch() {
        assert!(is_tap((0.0, 0.0), (3.0, 4.0), 120));
        assert!(!is_tap((0.0, 0.0), (30.0, 0.0), 120));
        assert!(!is_tap((0.0, 0.0), (1.0, 1.0), 450));
    }
}
