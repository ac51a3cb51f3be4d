use std::{
    thread,
    time::{Duration, Instant},
};

/// Fixed-rate ticker used to cap a loop's frame rate
///
/// Ticks that are missed because the loop fell behind are dropped rather than
/// delivered back to back
pub struct Ticker {
    period: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next: Instant::now() + period,
        }
    }

    /// Ticker firing `rate` times per second
    pub fn per_second(rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / rate.max(1))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blocks until the next tick
    pub fn tick(&mut self) {
        if let Some(wait) = self.next.checked_duration_since(Instant::now()) {
            thread::sleep(wait);
        }
        self.next = next_deadline(self.next, self.period, Instant::now());
    }
}

/// First deadline on the `period` grid starting at `deadline` that lies after `now`
fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let next = deadline + period;
    if next > now || period.is_zero() {
        return next;
    }

    // how far `now` sits past the last grid point it crossed
    let into_period = (now - deadline).as_nanos() % period.as_nanos();
    match u64::try_from(into_period) {
        Ok(nanos) => now + (period - Duration::from_nanos(nanos)),
        Err(_) => now + period,
    }
}

/// Running average of frames per second since a start time
pub struct FpsCounter {
    start: Instant,
    frames: u64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::starting_at(Instant::now())
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { start, frames: 0 }
    }

    /// Counts one presented frame
    pub fn frame(&mut self) {
        self.frames += 1;
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average FPS since the counter started
    pub fn average(&self) -> f64 {
        self.average_at(Instant::now())
    }

    /// Average FPS as of `now`; zero before any time has passed
    pub fn average_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.start).as_secs_f64();
        if elapsed > 0.0 {
            self.frames as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Average FPS formatted for display, e.g. `FPS: 59.94`
    pub fn label(&self) -> String {
        format!("FPS: {:.2}", self.average())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_advances_one_period_when_on_time() {
        let start = Instant::now();
        let period = Duration::from_millis(10);
        let next = next_deadline(start, period, start + Duration::from_millis(3));
        assert_eq!(next, start + period);
    }

    #[test]
    fn missed_ticks_are_dropped() {
        // 25ms late on a 10ms grid: ticks at 10 & 20 are skipped, next is 30
        let start = Instant::now();
        let period = Duration::from_millis(10);
        let next = next_deadline(start, period, start + Duration::from_millis(25));
        assert_eq!(next, start + Duration::from_millis(30));

        // exactly on a grid point still moves past it
        let next = next_deadline(start, period, start + Duration::from_millis(20));
        assert_eq!(next, start + Duration::from_millis(30));
    }

    #[test]
    fn long_stall_on_tiny_period() {
        // billions of missed 1ns ticks must not overflow the tick count
        let start = Instant::now();
        let period = Duration::from_nanos(1);
        let now = start + Duration::from_secs(10_000);
        let next = next_deadline(start, period, now);
        assert_eq!(next, now + period);

        let period = Duration::from_nanos(3);
        let now = start + Duration::from_nanos(u64::from(u32::MAX) * 7 + 1);
        let next = next_deadline(start, period, now);
        assert!(next > now && next <= now + period);
        assert_eq!((next - start).as_nanos() % 3, 0);
    }

    #[test]
    fn sixty_hertz_period() {
        let ticker = Ticker::per_second(60);
        assert_eq!(ticker.period(), Duration::from_secs(1) / 60);
        assert_eq!(Ticker::per_second(0).period(), Duration::from_secs(1));
    }

    #[test]
    fn average_is_frames_over_elapsed() {
        let start = Instant::now();
        let mut fps = FpsCounter::starting_at(start);
        for _ in 0..120 {
            fps.frame();
        }
        assert_eq!(fps.frames(), 120);
        let avg = fps.average_at(start + Duration::from_secs(2));
        assert!((avg - 60.0).abs() < 1e-9);
        assert_eq!(fps.average_at(start), 0.0);
    }

    #[test]
    fn label_has_two_decimals() {
        let fps = FpsCounter::starting_at(Instant::now() + Duration::from_secs(60));
        assert_eq!(fps.label(), "FPS: 0.00");
    }
}
