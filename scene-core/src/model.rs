//! The shared scene model.
//!
//! [`SceneModel`] holds every user-adjustable variable in the scene. The
//! render context owns the model and reads it freely while drawing; all
//! mutation goes through [`crate::command`], which applies queued commands
//! at one synchronization point per redraw tick. Mutators are therefore
//! crate-private; outside the crate the only write path is the queue.

use crate::types::Rgb;
use glam::DVec2;
use std::ops::RangeInclusive;

/// Sky color presets selected by palette index.
pub const SKY_PRESETS: [Rgb; 5] = [
    [247, 129, 129],
    [180, 141, 238],
    [93, 249, 249],
    [198, 238, 206],
    [253, 255, 179],
];

/// Sky color before any preset is chosen.
pub const SKY_DEFAULT: Rgb = [128, 80, 112];

/// Bounds for the interactive star side count.
pub const STAR_SIDES_RANGE: RangeInclusive<u32> = 3..=9;

/// Scene-unit distance within which a remove-near query matches.
pub const NEAR_THRESHOLD: f64 = 25.0;

/// Scene-unit step for a single moon move.
pub const MOON_STEP: f64 = 5.0;

/// All user-adjustable scene state.
///
/// Created once at startup with fixed defaults and alive for the process
/// lifetime. Accessors hand out copies (or read-only slices), so a caller
/// may hold a returned value across synchronization points without
/// observing later mutations through it.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneModel {
    origin: DVec2,
    cursor: Option<DVec2>,
    points: Vec<DVec2>,
    fences: Vec<DVec2>,
    sky: Rgb,
    star_sides: u32,
    moon: DVec2,
    flag_up: bool,
}

impl SceneModel {
    pub fn new() -> Self {
        Self {
            origin: DVec2::ZERO,
            cursor: None,
            points: Vec::new(),
            fences: Vec::new(),
            sky: SKY_DEFAULT,
            star_sides: 5,
            moon: DVec2::new(-250.0, 150.0),
            flag_up: true,
        }
    }

    // ---- read access (render pass) ----

    /// Current origin offset, as an independent copy.
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Current cursor position in scene coordinates, if the pointer is over
    /// the scene.
    pub fn cursor(&self) -> Option<DVec2> {
        self.cursor
    }

    /// User-placed star points, oldest first.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// User-placed fence anchors, oldest first.
    pub fn fences(&self) -> &[DVec2] {
        &self.fences
    }

    /// Current sky color channels.
    pub fn sky(&self) -> Rgb {
        self.sky
    }

    /// Current star side count, always within [`STAR_SIDES_RANGE`].
    pub fn star_sides(&self) -> u32 {
        self.star_sides
    }

    /// Current moon position in scene coordinates.
    pub fn moon(&self) -> DVec2 {
        self.moon
    }

    /// Whether the flag sits at the top of its pole.
    pub fn flag_up(&self) -> bool {
        self.flag_up
    }

    // ---- mutation (sync point only) ----

    pub(crate) fn translate_origin(&mut self, delta: DVec2) {
        self.origin += delta;
    }

    pub(crate) fn set_origin(&mut self, pos: DVec2) {
        self.origin = pos;
    }

    pub(crate) fn set_cursor(&mut self, pos: DVec2) {
        self.cursor = Some(pos);
    }

    pub(crate) fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub(crate) fn push_point(&mut self, pos: DVec2) {
        self.points.push(pos);
    }

    /// Removes the oldest point. No-op on an empty collection.
    pub(crate) fn remove_oldest_point(&mut self) {
        if !self.points.is_empty() {
            self.points.remove(0);
        }
    }

    /// Removes the newest point. No-op on an empty collection.
    pub(crate) fn remove_newest_point(&mut self) {
        self.points.pop();
    }

    /// Removes the first point within [`NEAR_THRESHOLD`] of `q`.
    ///
    /// Linear scan in insertion order; at most one point is removed. Returns
    /// `true` if a point was removed.
    pub(crate) fn remove_point_near(&mut self, q: DVec2) -> bool {
        remove_near(&mut self.points, q)
    }

    pub(crate) fn clear_points(&mut self) {
        self.points.clear();
    }

    /// Selects a sky preset. Out-of-range indices are ignored.
    pub(crate) fn set_sky_preset(&mut self, index: usize) {
        if let Some(&preset) = SKY_PRESETS.get(index) {
            self.sky = preset;
        }
    }

    /// Sets the star side count, clamped into [`STAR_SIDES_RANGE`].
    pub(crate) fn set_star_sides(&mut self, sides: u32) {
        self.star_sides = sides.clamp(*STAR_SIDES_RANGE.start(), *STAR_SIDES_RANGE.end());
    }

    pub(crate) fn move_moon(&mut self, delta: DVec2) {
        self.moon += delta;
    }

    pub(crate) fn toggle_flag(&mut self) {
        self.flag_up = !self.flag_up;
    }

    pub(crate) fn push_fence(&mut self, pos: DVec2) {
        self.fences.push(pos);
    }

    /// Removes the first fence anchor within [`NEAR_THRESHOLD`] of `q`.
    pub(crate) fn remove_fence_near(&mut self, q: DVec2) -> bool {
        remove_near(&mut self.fences, q)
    }
}

impl Default for SceneModel {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_near(items: &mut Vec<DVec2>, q: DVec2) -> bool {
    let hit = items
        .iter()
        .position(|p| p.distance_squared(q) <= NEAR_THRESHOLD * NEAR_THRESHOLD);
    match hit {
        Some(i) => {
            items.remove(i);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_scene() {
        let model = SceneModel::new();

        assert_eq!(model.origin(), DVec2::ZERO);
        assert_eq!(model.cursor(), None);
        assert!(model.points().is_empty());
        assert!(model.fences().is_empty());
        assert_eq!(model.sky(), SKY_DEFAULT);
        assert_eq!(model.star_sides(), 5);
        assert!(model.flag_up());
    }

    #[test]
    fn origin_read_returns_an_independent_copy() {
        let mut model = SceneModel::new();
        model.set_origin(DVec2::new(5.0, 5.0));

        let mut copy = model.origin();
        assert_eq!(copy, DVec2::new(5.0, 5.0));

        // Mutating the returned value must not affect the model.
        copy.x = 99.0;
        assert_eq!(model.origin(), DVec2::new(5.0, 5.0));
    }

    #[test]
    fn append_then_remove_oldest_on_singleton_yields_empty() {
        let mut model = SceneModel::new();
        model.push_point(DVec2::new(1.0, 2.0));
        model.remove_oldest_point();
        assert!(model.points().is_empty());
    }

    #[test]
    fn removals_on_empty_collection_are_no_ops() {
        let mut model = SceneModel::new();

        model.remove_oldest_point();
        model.remove_newest_point();
        assert!(!model.remove_point_near(DVec2::ZERO));
        assert!(!model.remove_fence_near(DVec2::ZERO));

        assert!(model.points().is_empty());
        assert!(model.fences().is_empty());
    }

    #[test]
    fn remove_oldest_and_newest_respect_insertion_order() {
        let mut model = SceneModel::new();
        for i in 0..4 {
            model.push_point(DVec2::new(i as f64, 0.0));
        }

        model.remove_oldest_point();
        assert_eq!(model.points()[0], DVec2::new(1.0, 0.0));

        model.remove_newest_point();
        assert_eq!(model.points().last(), Some(&DVec2::new(2.0, 0.0)));
    }

    #[test]
    fn remove_near_removes_only_the_first_in_threshold_match() {
        let mut model = SceneModel::new();
        model.push_point(DVec2::new(0.0, 0.0));
        model.push_point(DVec2::new(10.0, 0.0));

        // Both points are within 25 units of the query; only the first goes.
        assert!(model.remove_point_near(DVec2::new(5.0, 0.0)));
        assert_eq!(model.points(), &[DVec2::new(10.0, 0.0)]);
    }

    #[test]
    fn remove_near_leaves_out_of_threshold_points_alone() {
        let mut model = SceneModel::new();
        model.push_point(DVec2::new(100.0, 100.0));

        assert!(!model.remove_point_near(DVec2::ZERO));
        assert_eq!(model.points().len(), 1);
    }

    #[test]
    fn remove_near_matches_exactly_at_the_threshold() {
        let mut model = SceneModel::new();
        model.push_point(DVec2::new(NEAR_THRESHOLD, 0.0));

        assert!(model.remove_point_near(DVec2::ZERO));
        assert!(model.points().is_empty());
    }

    #[test]
    fn sky_presets_are_exact_and_idempotent() {
        let mut model = SceneModel::new();

        for (index, expected) in SKY_PRESETS.iter().enumerate() {
            model.set_sky_preset(index);
            assert_eq!(model.sky(), *expected);

            // Setting the same index twice changes nothing.
            model.set_sky_preset(index);
            assert_eq!(model.sky(), *expected);
        }
    }

    #[test]
    fn out_of_range_sky_preset_is_ignored() {
        let mut model = SceneModel::new();
        model.set_sky_preset(1);
        let before = model.sky();

        model.set_sky_preset(SKY_PRESETS.len());
        assert_eq!(model.sky(), before);
    }

    #[test]
    fn star_sides_are_clamped_into_range() {
        let mut model = SceneModel::new();

        model.set_star_sides(7);
        assert_eq!(model.star_sides(), 7);

        model.set_star_sides(0);
        assert_eq!(model.star_sides(), 3);

        model.set_star_sides(100);
        assert_eq!(model.star_sides(), 9);
    }

    #[test]
    fn moon_and_flag_mutators_work() {
        let mut model = SceneModel::new();
        let start = model.moon();

        model.move_moon(DVec2::new(MOON_STEP, 0.0));
        model.move_moon(DVec2::new(0.0, -MOON_STEP));
        assert_eq!(model.moon(), start + DVec2::new(MOON_STEP, -MOON_STEP));

        model.toggle_flag();
        assert!(!model.flag_up());
        model.toggle_flag();
        assert!(model.flag_up());
    }
}
