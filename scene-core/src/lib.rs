//! Core library for the interactive 2-D night-scene sandbox.
//!
//! Main components:
//! - [`attractor`] — chaotic-map integrators for the animated galaxy backdrop.
//! - [`camera`] — view ↔ scene coordinate mapping.
//! - [`model`] — the shared scene model read by the renderer.
//! - [`command`] — queued mutations applied at the per-frame sync point.
//! - [`starfield`] — decorative background stars.
//! - [`types`] — shared type aliases.

pub mod attractor;
pub mod camera;
pub mod command;
pub mod model;
pub mod starfield;
pub mod types;
