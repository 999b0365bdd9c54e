use glam::DVec2;

/// Maps between view coordinates (pixels, y-down, origin at the top left)
/// and scene coordinates (y-up, origin at the panned viewport center).
///
/// Queued view-coordinate commands are transformed with whichever camera is
/// current when the queue is drained, so the mapping lives in the core where
/// it can be exercised without a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Viewport size in pixels.
    pub viewport: DVec2,
    /// Scene-to-view scale factor.
    pub zoom: f64,
    /// View-space pan offset in pixels.
    pub pan: DVec2,
}

impl Camera {
    pub fn new(viewport: DVec2) -> Self {
        Self {
            viewport,
            zoom: 1.0,
            pan: DVec2::ZERO,
        }
    }

    /// Converts a view-space position to scene-space.
    pub fn view_to_scene(&self, p: DVec2) -> DVec2 {
        let center = self.viewport * 0.5;
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        DVec2::new(x, y)
    }

    /// Converts a scene-space position to view-space.
    ///
    /// Inverse of [`Camera::view_to_scene`] up to floating-point rounding.
    pub fn scene_to_view(&self, p: DVec2) -> DVec2 {
        let center = self.viewport * 0.5;
        DVec2::new(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }
}

impl Default for Camera {
    /// A camera for a 1280×720 viewport with no zoom or pan.
    fn default() -> Self {
        Self::new(DVec2::new(1280.0, 720.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_center_maps_to_scene_origin() {
        let camera = Camera::new(DVec2::new(800.0, 600.0));

        let scene = camera.view_to_scene(DVec2::new(400.0, 300.0));
        assert_eq!(scene, DVec2::ZERO);

        let view = camera.scene_to_view(DVec2::ZERO);
        assert_eq!(view, DVec2::new(400.0, 300.0));
    }

    #[test]
    fn y_axis_is_flipped_between_spaces() {
        let camera = Camera::new(DVec2::new(800.0, 600.0));

        // A point above the center in view space (smaller y) has positive
        // scene-space y.
        let scene = camera.view_to_scene(DVec2::new(400.0, 100.0));
        assert_eq!(scene, DVec2::new(0.0, 200.0));
    }

    #[test]
    fn view_to_scene_and_back_is_roundtrip() {
        let mut camera = Camera::new(DVec2::new(800.0, 600.0));
        // Use non-trivial zoom and pan to exercise the math.
        camera.zoom = 2.0;
        camera.pan = DVec2::new(15.0, -7.0);

        let view_points = [
            DVec2::new(0.0, 0.0),
            DVec2::new(123.0, 456.0),
            DVec2::new(-3.5, 8.25),
        ];

        let eps = 1e-9;

        for p in view_points {
            let scene = camera.view_to_scene(p);
            let back = camera.scene_to_view(scene);

            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }
}
