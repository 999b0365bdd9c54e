//! Chaotic-map integrators for the animated galaxy backdrop.
//!
//! Both systems are advanced by repeated fixed-step forward iteration from a
//! fixed initial condition, yielding a finite lazy sequence of points:
//! - [`Lorenz`] — the three-variable Lorenz system, integrated with forward
//!   Euler and projected to 2-D by [`GalaxyProjection`].
//! - [`Tinkerbell`] — the two-variable quadratic Tinkerbell map, with its
//!   per-frame iteration count governed by [`TraceBudget`].
//!
//! Given identical coefficients, step size, and iteration count, the produced
//! sequences are bit-for-bit reproducible. The trajectory is re-derived from
//! the initial condition on every pass; nothing is carried across frames
//! except the frame counter fed to [`GalaxyProjection`].

use glam::{DVec2, DVec3};

/// Coefficients and step size for the Lorenz system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
    /// Euler integration step.
    pub dt: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            dt: 0.01,
        }
    }
}

/// Forward-Euler integrator for the Lorenz system.
///
/// Implements [`Iterator`]; each call to `next` advances the state by one
/// step and yields the state *after* the step, so the initial condition
/// itself is never emitted. The sequence ends after the requested number
/// of points.
#[derive(Clone, Debug)]
pub struct Lorenz {
    params: LorenzParams,
    state: DVec3,
    remaining: usize,
}

impl Lorenz {
    /// Initial condition used by the galaxy backdrop.
    pub const DEFAULT_START: DVec3 = DVec3::new(0.1, 0.0, 0.0);

    /// Number of points the galaxy backdrop draws per pass.
    pub const POINTS_PER_PASS: usize = 10_000;

    /// Creates an integrator producing `count` points from `start`.
    pub fn new(params: LorenzParams, start: DVec3, count: usize) -> Self {
        Self {
            params,
            state: start,
            remaining: count,
        }
    }

    /// The canonical galaxy trajectory: default coefficients, default start,
    /// [`Lorenz::POINTS_PER_PASS`] points.
    pub fn galaxy() -> Self {
        Self::new(
            LorenzParams::default(),
            Self::DEFAULT_START,
            Self::POINTS_PER_PASS,
        )
    }
}

impl Iterator for Lorenz {
    type Item = DVec3;

    fn next(&mut self) -> Option<DVec3> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let s = self.state;
        let p = self.params;
        self.state = DVec3::new(
            s.x + p.dt * p.sigma * (s.y - s.x),
            s.y + p.dt * (s.x * (p.rho - s.z) - s.y),
            s.z + p.dt * (s.x * s.y - p.beta * s.z),
        );
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Lorenz {}

/// Projects raw Lorenz states into the galaxy's 2-D drawing space.
///
/// The projection discards `z`, mirrors and compresses `x` and `y`, and adds
/// a small vertical rise proportional to the frame counter so the galaxy
/// appears to drift upward even though the trajectory is recomputed from the
/// same initial condition every pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct GalaxyProjection {
    /// Monotonically increasing animation frame counter.
    pub frame: u64,
}

impl GalaxyProjection {
    /// Maps one integrator state to a 2-D galaxy-space point.
    ///
    /// ### Parameters
    /// - `s` - Raw state produced by [`Lorenz`].
    ///
    /// ### Returns
    /// The projected point; `x` is independent of the frame counter, `y`
    /// rises with it.
    pub fn project(&self, s: DVec3) -> DVec2 {
        let rise = 0.000_05 * self.frame as f64 * (1.5 - 0.05 * s.x);
        DVec2::new(-s.x / 30.0, s.y / 30.0 + rise)
    }
}

/// Coefficients for the Tinkerbell map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TinkerbellParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for TinkerbellParams {
    fn default() -> Self {
        Self {
            a: 0.9,
            b: -0.6013,
            c: 2.0,
            d: 0.5,
        }
    }
}

/// Iterator for the quadratic Tinkerbell map.
///
/// Like [`Lorenz`], each `next` call yields the state after one application
/// of the map, ending after the requested number of points.
#[derive(Clone, Debug)]
pub struct Tinkerbell {
    params: TinkerbellParams,
    state: DVec2,
    remaining: usize,
}

impl Tinkerbell {
    /// Initial condition used by the backdrop trace.
    pub const DEFAULT_START: DVec2 = DVec2::new(-0.72, -0.64);

    /// Creates an iterator producing `count` points from `start`.
    pub fn new(params: TinkerbellParams, start: DVec2, count: usize) -> Self {
        Self {
            params,
            state: start,
            remaining: count,
        }
    }

    /// The canonical trace: default coefficients and start, `count` points.
    pub fn map(count: usize) -> Self {
        Self::new(TinkerbellParams::default(), Self::DEFAULT_START, count)
    }
}

impl Iterator for Tinkerbell {
    type Item = DVec2;

    fn next(&mut self) -> Option<DVec2> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let s = self.state;
        let p = self.params;
        self.state = DVec2::new(
            s.x * s.x - s.y * s.y + p.a * s.x + p.b * s.y,
            2.0 * s.x * s.y + p.c * s.x + p.d * s.y,
        );
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Tinkerbell {}

/// How the Tinkerbell trace is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceStyle {
    /// Individual points.
    Points,
    /// Consecutive points joined into a line strip.
    Lines,
}

impl TraceStyle {
    fn toggled(self) -> Self {
        match self {
            TraceStyle::Points => TraceStyle::Lines,
            TraceStyle::Lines => TraceStyle::Points,
        }
    }
}

/// Per-frame iteration budget for the Tinkerbell trace.
///
/// The count grows by roughly 2 % per frame. Once it exceeds the cap it
/// resets to the start of the schedule and the rendering style toggles
/// between point-cloud and connected-line mode.
#[derive(Clone, Copy, Debug)]
pub struct TraceBudget {
    count: usize,
    style: TraceStyle,
    cap: usize,
}

impl TraceBudget {
    /// Cap used by the backdrop trace.
    pub const DEFAULT_CAP: usize = 100_000;

    /// Creates a budget starting at zero points in point-cloud style.
    pub fn new(cap: usize) -> Self {
        Self {
            count: 0,
            style: TraceStyle::Points,
            cap,
        }
    }

    /// Advances the schedule by one frame.
    ///
    /// The count is bumped by one (or reset to one with a style toggle if it
    /// has passed the cap) and then grown multiplicatively:
    /// `count = ⌊count · 1.02⌋ + 1`.
    pub fn advance(&mut self) {
        if self.count > self.cap {
            self.count = 1;
            self.style = self.style.toggled();
        } else {
            self.count += 1;
        }
        self.count = (self.count as f64 * 1.02).floor() as usize + 1;
    }

    /// Number of Tinkerbell iterations to draw this frame.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Current rendering style.
    pub fn style(&self) -> TraceStyle {
        self.style
    }
}
