use std::time::{Duration, Instant};

/// Frame clock. `delta` is what drives the cube's rotation so the speed does not depend on the frame rate.
pub struct AppTime {
    start_time: Instant,
    last_update: Instant,
    pub elapsed: Duration,
    pub delta: Duration,
    pub frame: u64,
}

impl AppTime {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            elapsed: Duration::default(),
            delta: Duration::default(),
            frame: 0,
        }
    }

    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        self.elapsed = now.saturating_duration_since(self.start_time);
        self.delta = now.saturating_duration_since(self.last_update);
        self.last_update = now;
        self.frame += 1;
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}

impl Default for AppTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_time_since_previous_update() {
        let mut apptime = AppTime::new();
        let start = apptime.start_time;

        apptime.update_at(start + Duration::from_millis(16));
        assert_eq!(apptime.delta, Duration::from_millis(16));
        assert_eq!(apptime.elapsed, Duration::from_millis(16));

        apptime.update_at(start + Duration::from_millis(50));
        assert_eq!(apptime.delta, Duration::from_millis(34));
        assert_eq!(apptime.elapsed, Duration::from_millis(50));
        assert_eq!(apptime.frame, 2);
        assert!((apptime.delta_seconds() - 0.034).abs() < 1e-6);
    }
}
