use std::time::Duration;

use cgmath::Zero;
use log::trace;

#[derive(Debug, PartialEq, PartialOrd)]
pub struct FrameCounter {
    // number of frames is incremented each time on_update() is called.
    frame_count: u64,
    // the fps value computed each time on_update() is called.
    fps: f64,
    // the duration between the last two frames.
    delta_time: Duration,
    // the last clock reading provided to on_update().
    last_time: Duration,
}

impl FrameCounter {
    /// Starts counting from the given platform clock reading.
    pub fn new(start: Duration) -> Self {
        Self {
            frame_count: 0,
            fps: 0.0,
            delta_time: Duration::ZERO,
            last_time: start,
        }
    }

    pub fn on_update(&mut self, current_time: Duration) {
        // a clock going backwards counts as an empty frame
        self.delta_time = current_time.saturating_sub(self.last_time);
        self.last_time = current_time;
        self.frame_count += 1;

        if !self.delta_time.is_zero() {
            self.fps = 1.0 / self.delta_time.as_secs_f64();
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }
}

/// Accumulates frame time and hands out fixed-size update steps.
///
/// At most `max_steps` steps are returned per frame. Time beyond that is
/// dropped so a slow frame cannot snowball into ever longer catch-ups.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedTimestep {
    step: Duration,
    max_steps: u32,
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(updates_per_second: u32, max_steps: u32) -> Self {
        Self {
            step: Duration::from_secs_f64(1.0 / f64::from(updates_per_second.max(1))),
            max_steps: max_steps.max(1),
            accumulator: Duration::ZERO,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Adds `delta_time` and returns how many update steps are due.
    pub fn advance(&mut self, delta_time: Duration) -> u32 {
        self.accumulator += delta_time;

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if self.accumulator >= self.step {
            trace!(
                "timestep: dropping {:?} after {} catch-up steps",
                self.accumulator,
                steps
            );
            self.accumulator = Duration::ZERO;
        }
        steps
    }
}

pub struct FpsPrinter<T: MovingAverage, F: Fn(f64)> {
    throttle: Duration,
    delta_time_accumulator: Duration,

    moving_average: T,
    print_fn: F,
}

impl<T, F> FpsPrinter<T, F>
where
    T: MovingAverage,
    F: Fn(f64),
{
    pub fn new(moving_average: T, print_fn: F) -> Self {
        Self {
            throttle: Duration::from_millis(1000),
            delta_time_accumulator: Duration::ZERO,
            moving_average,
            print_fn,
        }
    }

    pub fn with_throttle_ms(mut self, throttle_ms: u64) -> Self {
        self.throttle = Duration::from_millis(throttle_ms);
        self
    }

    pub fn on_update(&mut self, delta_time: Duration, fps: f64) {
        self.delta_time_accumulator += delta_time;
        if self.delta_time_accumulator >= self.throttle {
            self.delta_time_accumulator = Duration::ZERO;
            let fps_ma = self.moving_average.compute(fps);
            (self.print_fn)(fps_ma);
        }
    }
}

pub trait MovingAverage {
    fn compute(&mut self, value: f64) -> f64;
}

#[derive(Debug)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    moving_average: f64,
}

impl ExponentialMovingAverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

impl MovingAverage for ExponentialMovingAverage {
    fn compute(&mut self, value: f64) -> f64 {
        if self.moving_average.is_zero() {
            self.moving_average = value;
        }
        self.moving_average = self.alpha * self.moving_average + (1.0 - self.alpha) * value;
        self.moving_average
    }
}

impl Default for ExponentialMovingAverage {
    fn default() -> Self {
        Self {
            alpha: 0.9,
            moving_average: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn frame_counter_tracks_delta() {
        let mut counter = FrameCounter::new(Duration::from_millis(100));
        counter.on_update(Duration::from_millis(120));
        assert_eq!(counter.delta_time(), Duration::from_millis(20));
        assert_eq!(counter.frame_count(), 1);
        assert!((counter.fps() - 50.0).abs() < 1e-9);

        // zero-length frames keep the previous fps
        counter.on_update(Duration::from_millis(120));
        assert_eq!(counter.delta_time(), Duration::ZERO);
        assert!((counter.fps() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn one_step_per_matching_frame() {
        let frame_time = Duration::from_secs_f64(1.0 / 60.0);
        let mut timestep = FixedTimestep::new(60, 5);
        for _ in 0..100 {
            assert_eq!(timestep.advance(frame_time), 1);
        }
        assert_eq!(timestep.accumulated(), Duration::ZERO);
    }

    #[test]
    fn short_frames_accumulate() {
        let mut timestep = FixedTimestep::new(10, 5);
        assert_eq!(timestep.advance(Duration::from_millis(60)), 0);
        assert_eq!(timestep.advance(Duration::from_millis(60)), 1);
        assert_eq!(timestep.accumulated(), Duration::from_millis(20));
    }

    #[test]
    fn catch_up_is_bounded() {
        let mut timestep = FixedTimestep::new(10, 3);
        assert_eq!(timestep.advance(Duration::from_secs(2)), 3);
        assert_eq!(timestep.accumulated(), Duration::ZERO);
        assert_eq!(timestep.advance(Duration::from_millis(100)), 1);
    }

    #[test]
    fn fps_printer_is_throttled() {
        let printed = Cell::new(0);
        let mut printer =
            FpsPrinter::new(ExponentialMovingAverage::new(), |_| printed.set(printed.get() + 1))
                .with_throttle_ms(500);
        for _ in 0..9 {
            printer.on_update(Duration::from_millis(100), 60.0);
        }
        assert_eq!(printed.get(), 1);
    }

    #[test]
    fn moving_average_starts_at_first_value() {
        let mut average = ExponentialMovingAverage::new().with_alpha(0.5);
        assert_eq!(average.compute(10.0), 10.0);
        assert_eq!(average.compute(20.0), 15.0);
    }
}
