//! Tick timing.
//!
//! The [`Time`] resource carries the frame delta into systems that are driven
//! through a [`Schedule`](crate::ecs::Schedule). Unlike a windowed framework,
//! askr never reads a wall clock — the application loop owns the clock and
//! calls [`Time::advance`] once per tick with whatever `dt` it measured.

/// Tick timing resource, advanced externally once per tick.
#[derive(Clone, Copy, Debug)]
pub struct Time {
    delta: f32,
    elapsed: f64,
    tick_count: u64,
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: 0.0,
            elapsed: 0.0,
            tick_count: 0,
        }
    }

    /// Record the duration of the tick about to run. Call once per tick,
    /// before running the schedule.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt;
        self.elapsed += dt as f64;
        self.tick_count += 1;
    }

    /// Duration of the current tick in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta
    }

    /// Total time advanced so far, in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    /// Number of ticks advanced so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
