//! Queued scene mutations and the per-tick synchronization point.
//!
//! Input handlers never touch the [`SceneModel`] directly. They send
//! [`Command`] values through a clonable [`InputHandle`]; the render context
//! drains the paired [`CommandQueue`] exactly once per redraw tick, between
//! two render passes, applying commands in send order. The renderer can
//! therefore never observe a half-updated model.
//!
//! Commands carrying view coordinates (`*View` variants) are mapped into
//! scene coordinates with the [`Camera`] passed to [`CommandQueue::sync`] —
//! the transform active at the moment the mutation is applied, not the one
//! active when it was requested.

use crate::camera::Camera;
use crate::model::SceneModel;
use glam::DVec2;
use std::sync::mpsc::{self, Receiver, Sender};

/// A single queued scene mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Shift the origin by a scene-space delta.
    TranslateOrigin { delta: DVec2 },
    /// Set the origin directly in scene coordinates.
    SetOriginScene { pos: DVec2 },
    /// Set the origin from a view-space position.
    SetOriginView { pos: DVec2 },
    /// Set the cursor from a view-space position.
    SetCursorView { pos: DVec2 },
    /// Forget the cursor (pointer left the scene).
    ClearCursor,
    /// Append a star point from a view-space position.
    AddPointView { pos: DVec2 },
    /// Remove the oldest star point, if any.
    RemoveOldestPoint,
    /// Remove the newest star point, if any.
    RemoveNewestPoint,
    /// Remove the first star point near a scene-space query point.
    RemovePointNear { pos: DVec2 },
    /// Remove every star point.
    ClearPoints,
    /// Select a sky color preset by index.
    SetSkyPreset { index: usize },
    /// Set the star side count (clamped by the model).
    SetStarSides { sides: u32 },
    /// Shift the moon by a scene-space delta.
    MoveMoon { delta: DVec2 },
    /// Flip the flag between the top and bottom of its pole.
    ToggleFlag,
    /// Append a fence anchor from a view-space position.
    AddFenceView { pos: DVec2 },
    /// Remove the first fence anchor near a scene-space query point.
    RemoveFenceNear { pos: DVec2 },
}

impl SceneModel {
    /// Applies one command, mapping view-space payloads through `camera`.
    ///
    /// Applying a batch of commands in queued order is equivalent to calling
    /// this once per command in that same order; there is no reordering and
    /// no interleaving.
    pub fn apply(&mut self, cmd: Command, camera: &Camera) {
        match cmd {
            Command::TranslateOrigin { delta } => self.translate_origin(delta),
            Command::SetOriginScene { pos } => self.set_origin(pos),
            Command::SetOriginView { pos } => self.set_origin(camera.view_to_scene(pos)),
            Command::SetCursorView { pos } => self.set_cursor(camera.view_to_scene(pos)),
            Command::ClearCursor => self.clear_cursor(),
            Command::AddPointView { pos } => self.push_point(camera.view_to_scene(pos)),
            Command::RemoveOldestPoint => self.remove_oldest_point(),
            Command::RemoveNewestPoint => self.remove_newest_point(),
            Command::RemovePointNear { pos } => {
                self.remove_point_near(pos);
            }
            Command::ClearPoints => self.clear_points(),
            Command::SetSkyPreset { index } => self.set_sky_preset(index),
            Command::SetStarSides { sides } => self.set_star_sides(sides),
            Command::MoveMoon { delta } => self.move_moon(delta),
            Command::ToggleFlag => self.toggle_flag(),
            Command::AddFenceView { pos } => self.push_fence(camera.view_to_scene(pos)),
            Command::RemoveFenceNear { pos } => {
                self.remove_fence_near(pos);
            }
        }
    }
}

/// Input-context end of the queue.
///
/// Clonable and `Send`: hand one to every input source. Sending never
/// blocks. If the render side has gone away the event is silently dropped —
/// a lost input event carries no recovery obligation.
#[derive(Clone, Debug)]
pub struct InputHandle {
    tx: Sender<Command>,
}

impl InputHandle {
    /// Queues a mutation for the next synchronization point.
    pub fn send(&self, cmd: Command) {
        let _ = self.tx.send(cmd);
    }
}

/// Render-context end of the queue, owned alongside the [`SceneModel`].
#[derive(Debug)]
pub struct CommandQueue {
    rx: Receiver<Command>,
}

impl CommandQueue {
    /// The per-tick synchronization point.
    ///
    /// Drains every command queued since the previous call and applies them
    /// to `model` in send order, mapping view-space payloads through
    /// `camera`. Call exactly once per redraw tick, between two render
    /// passes.
    ///
    /// ### Returns
    /// The number of commands applied.
    pub fn sync(&self, model: &mut SceneModel, camera: &Camera) -> usize {
        let mut applied = 0;
        while let Ok(cmd) = self.rx.try_recv() {
            model.apply(cmd, camera);
            applied += 1;
        }
        applied
    }
}

/// Creates a connected input-handle/queue pair.
pub fn channel() -> (InputHandle, CommandQueue) {
    let (tx, rx) = mpsc::channel();
    (InputHandle { tx }, CommandQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SKY_PRESETS, SceneModel};
    use std::thread;

    #[test]
    fn drained_batch_equals_one_at_a_time_application() {
        let camera = Camera::default();
        let commands = [
            Command::SetOriginScene {
                pos: DVec2::new(5.0, 5.0),
            },
            Command::AddPointView {
                pos: DVec2::new(100.0, 100.0),
            },
            Command::AddPointView {
                pos: DVec2::new(200.0, 50.0),
            },
            Command::RemoveOldestPoint,
            Command::SetSkyPreset { index: 3 },
            Command::SetStarSides { sides: 8 },
            Command::TranslateOrigin {
                delta: DVec2::new(-1.0, 2.0),
            },
        ];

        // Queue the whole batch and drain it once.
        let (input, queue) = channel();
        let mut drained = SceneModel::new();
        for cmd in commands {
            input.send(cmd);
        }
        assert_eq!(queue.sync(&mut drained, &camera), commands.len());

        // Apply the same commands one at a time in the same order.
        let mut stepped = SceneModel::new();
        for cmd in commands {
            stepped.apply(cmd, &camera);
        }

        assert_eq!(drained, stepped);
    }

    #[test]
    fn sync_on_an_empty_queue_applies_nothing() {
        let (_input, queue) = channel();
        let mut model = SceneModel::new();
        let before = model.clone();

        assert_eq!(queue.sync(&mut model, &Camera::default()), 0);
        assert_eq!(model, before);
    }

    #[test]
    fn view_commands_use_the_camera_active_at_apply_time() {
        let (input, queue) = channel();
        let mut model = SceneModel::new();

        // Request the mutation under one camera...
        let at_send = Camera::new(DVec2::new(800.0, 600.0));
        input.send(Command::SetCursorView {
            pos: DVec2::new(400.0, 300.0),
        });

        // ...but drain under another, panned by 100 pixels.
        let mut at_apply = at_send;
        at_apply.pan = DVec2::new(100.0, 0.0);
        queue.sync(&mut model, &at_apply);

        // The apply-time camera wins: the viewport center lands at -100, not 0.
        assert_eq!(model.cursor(), Some(DVec2::new(-100.0, 0.0)));
        assert_ne!(model.cursor(), Some(at_send.view_to_scene(DVec2::new(400.0, 300.0))));
    }

    #[test]
    fn commands_sent_from_another_thread_arrive_in_order() {
        let (input, queue) = channel();
        let mut model = SceneModel::new();

        let worker = thread::spawn({
            let input = input.clone();
            move || {
                for i in 0..10 {
                    input.send(Command::AddPointView {
                        pos: DVec2::new(i as f64, 0.0),
                    });
                }
            }
        });
        worker.join().unwrap();

        let camera = Camera::new(DVec2::new(0.0, 0.0));
        assert_eq!(queue.sync(&mut model, &camera), 10);

        // With a zero-sized viewport the view x maps to scene x directly.
        let xs: Vec<f64> = model.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, (0..10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn events_after_queue_drop_are_lost_without_panicking() {
        let (input, queue) = channel();
        drop(queue);

        // Nothing to assert beyond "does not panic or block".
        input.send(Command::ClearPoints);
    }

    #[test]
    fn full_key_binding_sweep_applies_cleanly() {
        let (input, queue) = channel();
        let mut model = SceneModel::new();
        let camera = Camera::default();

        for index in 0..SKY_PRESETS.len() {
            input.send(Command::SetSkyPreset { index });
        }
        for sides in 3..=9 {
            input.send(Command::SetStarSides { sides });
        }
        input.send(Command::MoveMoon {
            delta: DVec2::new(5.0, 0.0),
        });
        input.send(Command::ToggleFlag);
        input.send(Command::ClearPoints);

        queue.sync(&mut model, &camera);

        assert_eq!(model.sky(), SKY_PRESETS[SKY_PRESETS.len() - 1]);
        assert_eq!(model.star_sides(), 9);
        assert!(!model.flag_up());
    }
}
