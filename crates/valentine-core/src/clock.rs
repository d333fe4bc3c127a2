use instant::Instant;

/// Frame delta source for the particle loop.
///
/// Deltas are wall-clock seconds since the previous tick, clamped so a long
/// pause (background tab) only advances the simulation by `max_dt`.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    max_dt: f32,
    first_frame_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32, first_frame_dt: f32) -> Self {
        Self {
            last: None,
            max_dt,
            first_frame_dt: first_frame_dt.min(max_dt),
        }
    }

    pub fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(prev) if now >= prev => clamp_dt((now - prev).as_secs_f32(), self.max_dt),
            Some(_) => 0.0,
            None => self.first_frame_dt,
        };
        self.last = Some(now);
        dt
    }

    /// Forget the previous timestamp; the next tick uses the first-frame delta.
    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }
}

#[inline]
pub fn clamp_dt(raw: f32, max_dt: f32) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, max_dt)
    } else {
        max_dt
    }
}
