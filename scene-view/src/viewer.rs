//! Interactive night-scene viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the scene state
//! ([`SceneModel`], command queue, camera, frame counter) and implements
//! [`eframe::App`] to render the scene and feed user input into the
//! synchronizer.
//!
//! The typical per-frame update is:
//! 1. Translate keyboard and pointer input into queued [`Command`]s.
//! 2. Drain the queue once — the synchronization point — so the model is
//!    fully updated before any drawing reads it.
//! 3. Advance the frame counter and trace budget, then render the scene.
//!
//! Everything drawn here (sky, starfield, galaxy, Tinkerbell trace,
//! user-placed stars, moon, fences, flag, cursor ring) is sample content;
//! the contracts live in `scene-core`.

use eframe::App;
use glam::DVec2;
use rand::rng;
use scene_core::{
    attractor::{GalaxyProjection, Lorenz, Tinkerbell, TraceBudget, TraceStyle},
    camera::Camera,
    command::{self, Command, CommandQueue, InputHandle},
    model::{MOON_STEP, NEAR_THRESHOLD, SceneModel},
    starfield::Starfield,
};

/// Number of decorative background stars scattered at startup.
const STARFIELD_COUNT: usize = 120;

/// Sky-preset key bindings (palette index per key).
const SKY_KEYS: [(egui::Key, usize); 5] = [
    (egui::Key::Z, 0),
    (egui::Key::X, 1),
    (egui::Key::C, 2),
    (egui::Key::V, 3),
    (egui::Key::B, 4),
];

/// Star side-count key bindings.
const SIDES_KEYS: [(egui::Key, u32); 7] = [
    (egui::Key::Num3, 3),
    (egui::Key::Num4, 4),
    (egui::Key::Num5, 5),
    (egui::Key::Num6, 6),
    (egui::Key::Num7, 7),
    (egui::Key::Num8, 8),
    (egui::Key::Num9, 9),
];

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The core: [`SceneModel`], [`CommandQueue`]/[`InputHandle`], [`Camera`].
/// - Decorative state: [`Starfield`], [`TraceBudget`], the frame counter.
/// - eframe/egui callbacks for drawing and user interaction.
///
/// Input handlers only ever touch `input`; the model is mutated exclusively
/// by `queue.sync(..)`, called once per frame before drawing.
pub struct Viewer {
    model: SceneModel,
    queue: CommandQueue,
    input: InputHandle,
    camera: Camera,

    starfield: Starfield,
    budget: TraceBudget,
    frame: u64,
}

impl Viewer {
    /// Creates a viewer with default scene state and a random starfield.
    pub fn new() -> Self {
        let mut rng = rng();
        let (input, queue) = command::channel();
        let camera = Camera::default();

        // Scatter background stars over the sky portion of the scene.
        let starfield = Starfield::random_in_rect(
            STARFIELD_COUNT,
            DVec2::new(-640.0, -40.0),
            DVec2::new(640.0, 360.0),
            &mut rng,
        );

        log::info!(
            "night scene initialized with {} background stars",
            starfield.stars.len()
        );

        Self {
            model: SceneModel::new(),
            queue,
            input,
            camera,
            starfield,
            budget: TraceBudget::new(TraceBudget::DEFAULT_CAP),
            frame: 0,
        }
    }

    /// Per-frame bookkeeping: advances the animation counter and the
    /// Tinkerbell trace budget.
    fn advance_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        self.budget.advance();
    }

    /// Translates keyboard state into queued commands.
    ///
    /// Arrows move the moon (with shift held they translate the origin
    /// instead), `Q`/`W` delete the oldest/newest star, `Z X C V B` select
    /// sky presets, `3`–`9` set the star side count, `Delete` clears all
    /// stars, `F` flips the flag.
    fn dispatch_key_commands(&self, ctx: &egui::Context) {
        ctx.input(|i| {
            let mut delta = DVec2::ZERO;
            if i.key_pressed(egui::Key::ArrowLeft) {
                delta.x -= MOON_STEP;
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                delta.x += MOON_STEP;
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                delta.y += MOON_STEP;
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                delta.y -= MOON_STEP;
            }
            if delta != DVec2::ZERO {
                if i.modifiers.shift {
                    self.input.send(Command::TranslateOrigin { delta });
                } else {
                    self.input.send(Command::MoveMoon { delta });
                }
            }

            if i.key_pressed(egui::Key::Q) {
                self.input.send(Command::RemoveOldestPoint);
            }
            if i.key_pressed(egui::Key::W) {
                self.input.send(Command::RemoveNewestPoint);
            }

            for (key, index) in SKY_KEYS {
                if i.key_pressed(key) {
                    self.input.send(Command::SetSkyPreset { index });
                }
            }
            for (key, sides) in SIDES_KEYS {
                if i.key_pressed(key) {
                    self.input.send(Command::SetStarSides { sides });
                }
            }

            if i.key_pressed(egui::Key::Delete) {
                self.input.send(Command::ClearPoints);
            }
            if i.key_pressed(egui::Key::F) {
                self.input.send(Command::ToggleFlag);
            }
        });
    }

    /// Translates pointer state over the canvas into queued commands.
    ///
    /// Click or drag places a star; with shift held a click removes the
    /// star nearest the cursor instead. The secondary button places a fence
    /// board (shift removes the nearest one). Pointer motion keeps the
    /// cursor up to date; leaving the canvas clears it.
    fn dispatch_pointer_commands(&self, ui: &egui::Ui, response: &egui::Response) {
        let rect = response.rect;
        let shift = ui.input(|i| i.modifiers.shift);

        if let Some(hover) = response.hover_pos() {
            let pos = view_pos(rect, hover);
            self.input.send(Command::SetCursorView { pos });

            if response.clicked() || response.dragged() {
                if shift {
                    // The removal query is the cursor the model saw last
                    // frame, already in scene coordinates.
                    if let Some(cursor) = self.model.cursor() {
                        self.input.send(Command::RemovePointNear { pos: cursor });
                    }
                } else {
                    self.input.send(Command::AddPointView { pos });
                }
            }

            if response.secondary_clicked() {
                if shift {
                    if let Some(cursor) = self.model.cursor() {
                        self.input.send(Command::RemoveFenceNear { pos: cursor });
                    }
                } else {
                    self.input.send(Command::AddFenceView { pos });
                }
            }
        } else if self.model.cursor().is_some() {
            self.input.send(Command::ClearCursor);
        }
    }

    /// Adjusts zoom around the pointer from scroll input.
    fn handle_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
        if scroll == 0.0 {
            return;
        }
        let rect = response.rect;
        let pointer = response.hover_pos().unwrap_or(rect.center());

        let world_before = self.camera.view_to_scene(view_pos(rect, pointer));

        let factor = (1.0 + scroll as f64 * 0.001).clamp(0.5, 2.0);
        self.camera.zoom = (self.camera.zoom * factor).clamp(0.25, 4.0);

        let view_after = self.camera.scene_to_view(world_before);
        self.camera.pan += view_pos(rect, pointer) - view_after;
    }

    /// Converts a scene-space position to a screen position inside `rect`.
    fn to_screen(&self, rect: egui::Rect, scene: DVec2) -> egui::Pos2 {
        let v = self.camera.scene_to_view(scene);
        egui::pos2(rect.min.x + v.x as f32, rect.min.y + v.y as f32)
    }

    /// Maps a galaxy-space point (x in `-1..=1`, y in `-1.45..=1`) onto the
    /// panel, y up.
    fn galaxy_to_screen(rect: egui::Rect, g: DVec2) -> egui::Pos2 {
        let tx = ((g.x + 1.0) / 2.0) as f32;
        let ty = ((g.y + 1.45) / 2.45) as f32;
        egui::pos2(
            rect.min.x + tx * rect.width(),
            rect.max.y - ty * rect.height(),
        )
    }

    /// Maps a Tinkerbell-space point onto the panel, recentering the map's
    /// natural extent into the unit square first.
    fn trace_to_screen(rect: egui::Rect, p: DVec2) -> egui::Pos2 {
        let tx = ((p.x + 0.4 + 1.0) / 2.0) as f32;
        let ty = (((p.y + 0.5) / 1.1 + 1.0) / 2.0) as f32;
        egui::pos2(
            rect.min.x + tx * rect.width(),
            rect.max.y - ty * rect.height(),
        )
    }

    // ---- drawing (sample content) ----

    /// Sky gradient over a grass band, tinted by the model's sky color.
    fn draw_sky(&self, painter: &egui::Painter, rect: egui::Rect) {
        let [r, g, b] = self.model.sky();
        let horizon = rect.bottom() - rect.height() * 0.18;

        let bottom = egui::Color32::from_rgb(r, g, b);
        let top = egui::Color32::from_rgb(32, 48, 96);

        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(rect.left_top(), top);
        mesh.colored_vertex(rect.right_top(), top);
        mesh.colored_vertex(egui::pos2(rect.right(), horizon), bottom);
        mesh.colored_vertex(egui::pos2(rect.left(), horizon), bottom);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        painter.add(egui::Shape::mesh(mesh));

        let grass = egui::Rect::from_min_max(egui::pos2(rect.left(), horizon), rect.max);
        painter.rect_filled(grass, 0.0, egui::Color32::from_rgb(20, 45, 0));
    }

    fn draw_starfield(&self, painter: &egui::Painter, rect: egui::Rect) {
        for star in &self.starfield.stars {
            let p = self.to_screen(rect, star.pos);
            let v = (star.brightness * 255.0) as u8;
            painter.circle_filled(p, 1.5, egui::Color32::from_gray(v));
        }
    }

    /// The Lorenz "galaxy": one full trajectory per frame, with a short run
    /// of points near the animation window cycling through warm colors.
    fn draw_galaxy(&self, painter: &egui::Painter, rect: egui::Rect) {
        let projection = GalaxyProjection { frame: self.frame };
        let window = (self.frame % Lorenz::POINTS_PER_PASS as u64) as i64;

        for (i, s) in Lorenz::galaxy().enumerate() {
            let p = Self::galaxy_to_screen(rect, projection.project(s));
            let n = window - i as i64;

            let color = if n.abs() <= 20 {
                let cw = ((n + 20) * 6 + 15) as u8;
                egui::Color32::from_rgba_unmultiplied(255, 255 - cw, cw, 255 - cw)
            } else {
                // Faint background dust, brightness taken from z.
                let cc = (((s.z + 30.0) / 60.0).clamp(0.0, 1.0) * 255.0) as u8;
                egui::Color32::from_rgba_unmultiplied(cc, cc, cc, 13)
            };

            painter.circle_filled(p, 2.0, color);
        }
    }

    /// The Tinkerbell trace, as points or a line strip per the budget.
    fn draw_tinkerbell(&self, painter: &egui::Painter, rect: egui::Rect) {
        let points: Vec<egui::Pos2> = Tinkerbell::map(self.budget.count())
            .map(|p| Self::trace_to_screen(rect, p))
            .collect();

        match self.budget.style() {
            TraceStyle::Points => {
                for p in &points {
                    painter.circle_filled(*p, 1.0, egui::Color32::WHITE);
                }
            }
            TraceStyle::Lines => {
                painter.add(egui::Shape::line(
                    points,
                    egui::Stroke::new(1.0, egui::Color32::WHITE),
                ));
            }
        }
    }

    /// Fills and outlines one star polygon centered at `center` (scene
    /// coordinates), using the model's side count.
    fn draw_star(&self, painter: &egui::Painter, rect: egui::Rect, center: DVec2) {
        let ring = star_ring(center, self.model.star_sides(), 20.0, 8.0);

        // Triangle-fan fill around the center.
        let fill = egui::Color32::YELLOW;
        let mut mesh = egui::Mesh::default();
        mesh.colored_vertex(self.to_screen(rect, center), fill);
        for v in &ring {
            mesh.colored_vertex(self.to_screen(rect, *v), fill);
        }
        for i in 1..ring.len() as u32 {
            mesh.add_triangle(0, i, i + 1);
        }
        painter.add(egui::Shape::mesh(mesh));

        let outline: Vec<egui::Pos2> = ring.iter().map(|&v| self.to_screen(rect, v)).collect();
        painter.add(egui::Shape::line(
            outline,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));
    }

    fn draw_user_stars(&self, painter: &egui::Painter, rect: egui::Rect) {
        let origin = self.model.origin();
        for &p in self.model.points() {
            self.draw_star(painter, rect, origin + p);
        }
    }

    fn draw_moon(&self, painter: &egui::Painter, rect: egui::Rect) {
        let moon = self.model.moon();
        let r = (30.0 * self.camera.zoom) as f32;

        painter.circle_filled(self.to_screen(rect, moon), r, egui::Color32::WHITE);

        // Offset dark limb carves the crescent.
        let dark = self.to_screen(rect, moon + DVec2::new(12.0, 8.0));
        painter.circle_filled(dark, r, egui::Color32::from_rgb(64, 64, 80));
    }

    fn draw_fences(&self, painter: &egui::Painter, rect: egui::Rect) {
        let tan = egui::Color32::from_rgb(192, 192, 128);
        let origin = self.model.origin();

        for (i, &anchor) in self.model.fences().iter().enumerate() {
            // Alternate the taller edge so neighboring boards zig-zag.
            let (left_h, right_h) = if i % 2 == 0 { (102.0, 112.0) } else { (112.0, 102.0) };
            let base = origin + anchor;
            let corners = [
                base,
                base + DVec2::new(24.0, 0.0),
                base + DVec2::new(24.0, right_h),
                base + DVec2::new(0.0, left_h),
            ];
            let screen: Vec<egui::Pos2> =
                corners.iter().map(|&c| self.to_screen(rect, c)).collect();

            painter.add(egui::Shape::convex_polygon(
                screen,
                tan,
                egui::Stroke::new(1.0, egui::Color32::BLACK),
            ));
        }
    }

    fn draw_flag(&self, painter: &egui::Painter, rect: egui::Rect) {
        let base = self.model.origin() + DVec2::new(250.0, -150.0);
        let top = base + DVec2::new(0.0, 160.0);

        painter.line_segment(
            [self.to_screen(rect, base), self.to_screen(rect, top)],
            egui::Stroke::new(3.0, egui::Color32::from_rgb(117, 117, 117)),
        );

        let hoist = if self.model.flag_up() {
            top
        } else {
            base + DVec2::new(0.0, 40.0)
        };
        let corners = [
            hoist,
            hoist + DVec2::new(60.0, 0.0),
            hoist + DVec2::new(60.0, -36.0),
            hoist + DVec2::new(0.0, -36.0),
        ];
        let screen: Vec<egui::Pos2> = corners.iter().map(|&c| self.to_screen(rect, c)).collect();
        painter.add(egui::Shape::convex_polygon(
            screen,
            egui::Color32::WHITE,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        ));
        painter.circle_filled(
            self.to_screen(rect, hoist + DVec2::new(30.0, -18.0)),
            (9.0 * self.camera.zoom) as f32,
            egui::Color32::from_rgb(169, 0, 0),
        );
    }

    /// White ring at the cursor; its radius is the remove-near threshold.
    fn draw_cursor(&self, painter: &egui::Painter, rect: egui::Rect) {
        if let Some(cursor) = self.model.cursor() {
            painter.circle_stroke(
                self.to_screen(rect, cursor),
                (NEAR_THRESHOLD * self.camera.zoom) as f32,
                egui::Stroke::new(1.0, egui::Color32::WHITE),
            );
        }
    }

    /// Bottom status bar: pointer position, star count, trace state, frame.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("frame = {}", self.frame));
                ui.label(format!(
                    "trace = {} ({})",
                    self.budget.count(),
                    match self.budget.style() {
                        TraceStyle::Points => "points",
                        TraceStyle::Lines => "lines",
                    }
                ));
                ui.separator();
                ui.label(format!("stars = {}", self.model.points().len()));
                let pointer = match self.model.cursor() {
                    Some(c) => format!("pointer at ({:.3}, {:.3})", c.x, c.y),
                    None => "no pointer".to_owned(),
                };
                ui.label(pointer);
            });
        });
    }

    /// Central canvas: gathers pointer input, runs the synchronization
    /// point, then draws the whole scene.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response =
                ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;

            // The camera tracks the canvas size before any command applies,
            // so queued view-space payloads map through current geometry.
            self.camera.viewport = DVec2::new(rect.width() as f64, rect.height() as f64);
            self.handle_zoom(ui, &response);

            self.dispatch_pointer_commands(ui, &response);

            // Synchronization point: everything queued since the previous
            // pass is applied here, before any drawing reads the model.
            let applied = self.queue.sync(&mut self.model, &self.camera);
            if applied > 0 {
                log::debug!("applied {applied} queued command(s)");
            }

            self.advance_frame();

            let painter = ui.painter_at(rect);
            self.draw_sky(&painter, rect);
            self.draw_starfield(&painter, rect);
            self.draw_galaxy(&painter, rect);
            self.draw_tinkerbell(&painter, rect);
            self.draw_moon(&painter, rect);
            self.draw_fences(&painter, rect);
            self.draw_flag(&painter, rect);
            self.draw_user_stars(&painter, rect);
            self.draw_cursor(&painter, rect);
        });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.dispatch_key_commands(ctx);
        self.ui_status_bar(ctx);
        self.ui_central_panel(ctx);

        // Keep the redraw cadence going; egui only repaints on input
        // otherwise.
        ctx.request_repaint();
    }
}

/// Converts an absolute egui position into view coordinates relative to the
/// canvas rectangle.
fn view_pos(rect: egui::Rect, p: egui::Pos2) -> DVec2 {
    DVec2::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64)
}

/// Vertices of a star outline around `center`: `sides` outer points at
/// radius `r1` interleaved with inner points at `r2`, closed back onto the
/// starting vertex.
fn star_ring(center: DVec2, sides: u32, r1: f64, r2: f64) -> Vec<DVec2> {
    use std::f64::consts::PI;

    let delta = PI / sides as f64;
    let start = 0.5 * PI;
    let mut theta = start;

    let mut ring = Vec::with_capacity(sides as usize * 2 + 1);
    for _ in 0..sides {
        ring.push(center + r1 * DVec2::new(theta.cos(), theta.sin()));
        theta += delta;
        ring.push(center + r2 * DVec2::new(theta.cos(), theta.sin()));
        theta += delta;
    }
    ring.push(center + r1 * DVec2::new(start.cos(), start.sin()));
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::model::{SKY_DEFAULT, SKY_PRESETS};

    #[test]
    fn queued_commands_apply_only_at_the_sync_point() {
        let mut viewer = Viewer::new();

        viewer.input.send(Command::SetSkyPreset { index: 2 });

        // Nothing applied yet: the model still shows the default sky.
        assert_eq!(viewer.model.sky(), SKY_DEFAULT);

        let applied = viewer.queue.sync(&mut viewer.model, &viewer.camera);
        assert_eq!(applied, 1);
        assert_eq!(viewer.model.sky(), SKY_PRESETS[2]);
    }

    #[test]
    fn advance_frame_moves_counter_and_budget_together() {
        let mut viewer = Viewer::new();
        assert_eq!(viewer.frame, 0);
        assert_eq!(viewer.budget.count(), 0);

        viewer.advance_frame();
        assert_eq!(viewer.frame, 1);
        assert_eq!(viewer.budget.count(), 2);
    }

    #[test]
    fn galaxy_mapping_covers_the_panel() {
        let rect = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(1280.0, 720.0));

        let bottom_left = Viewer::galaxy_to_screen(rect, DVec2::new(-1.0, -1.45));
        let top_right = Viewer::galaxy_to_screen(rect, DVec2::new(1.0, 1.0));

        assert_eq!(bottom_left, egui::pos2(0.0, 720.0));
        assert_eq!(top_right, egui::pos2(1280.0, 0.0));
    }

    #[test]
    fn star_ring_is_closed_and_has_expected_vertex_count() {
        let ring = star_ring(DVec2::new(10.0, -4.0), 5, 20.0, 8.0);

        // Two vertices per side plus the closing copy of the first.
        assert_eq!(ring.len(), 11);

        let eps = 1e-9;
        let first = ring[0];
        let last = *ring.last().unwrap();
        assert!((first.x - last.x).abs() < eps && (first.y - last.y).abs() < eps);
    }
}
