use std::collections::VecDeque;
use std::time::Duration;

use input::Event;
use log::trace;
use renderer_2d::graphics::{GraphicsContext, HeadlessContext};

use crate::Result;

/// Window, event source and clock the engine runs on.
pub trait Platform {
    fn should_close(&self) -> bool;

    /// Events that arrived since the previous call.
    fn poll_events(&mut self) -> Vec<Event>;

    /// Time since the platform started.
    fn elapsed(&self) -> Duration;

    fn graphics(&mut self) -> &mut dyn GraphicsContext;

    fn begin_frame(&mut self) -> Result<()>;

    fn present(&mut self) -> Result<()>;
}

/// Platform without a window: a [`HeadlessContext`] for graphics, a clock
/// that advances by a fixed frame time on every poll, and scripted events.
#[derive(Debug)]
pub struct HeadlessPlatform {
    graphics: HeadlessContext,
    frame_time: Duration,
    elapsed: Duration,
    frame_limit: Option<u64>,
    frames_presented: u64,
    in_frame: bool,
    closed: bool,
    // (frame index, event), sorted by frame
    scripted: VecDeque<(u64, Event)>,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_time(mut self, frame_time: Duration) -> Self {
        self.frame_time = frame_time;
        self
    }

    /// Bounds the recorded command log, for runs without a frame limit.
    pub fn with_command_limit(mut self, limit: usize) -> Self {
        self.graphics = self.graphics.with_command_limit(limit);
        self
    }

    /// Requests close once `frame_limit` frames were presented.
    pub fn with_frame_limit(mut self, frame_limit: u64) -> Self {
        self.frame_limit = Some(frame_limit);
        self
    }

    /// Delivers `event` by the poll that starts frame `frame`.
    pub fn with_event(mut self, frame: u64, event: Event) -> Self {
        self.push_event(frame, event);
        self
    }

    pub fn push_event(&mut self, frame: u64, event: Event) {
        let index = self
            .scripted
            .iter()
            .position(|(at, _)| *at > frame)
            .unwrap_or(self.scripted.len());
        self.scripted.insert(index, (frame, event));
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn context(&self) -> &HeadlessContext {
        &self.graphics
    }

    pub fn context_mut(&mut self) -> &mut HeadlessContext {
        &mut self.graphics
    }
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self {
            graphics: HeadlessContext::new(),
            frame_time: Duration::from_secs_f64(1.0 / 60.0),
            elapsed: Duration::ZERO,
            frame_limit: None,
            frames_presented: 0,
            in_frame: false,
            closed: false,
            scripted: VecDeque::new(),
        }
    }
}

impl Platform for HeadlessPlatform {
    fn should_close(&self) -> bool {
        self.closed
            || self
                .frame_limit
                .map_or(false, |limit| self.frames_presented >= limit)
    }

    fn poll_events(&mut self) -> Vec<Event> {
        self.elapsed += self.frame_time;

        let mut events = Vec::new();
        while let Some((frame, _)) = self.scripted.front() {
            if *frame > self.frames_presented {
                break;
            }
            if let Some((_, event)) = self.scripted.pop_front() {
                if event == Event::WindowClose {
                    self.closed = true;
                }
                events.push(event);
            }
        }
        if !events.is_empty() {
            trace!("headless platform: {} events", events.len());
        }
        events
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn graphics(&mut self) -> &mut dyn GraphicsContext {
        &mut self.graphics
    }

    fn begin_frame(&mut self) -> Result<()> {
        if self.in_frame {
            return Err("begin_frame called twice without present".into());
        }
        self.in_frame = true;
        self.graphics.clear();
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        if !self.in_frame {
            return Err("present called outside of a frame".into());
        }
        self.in_frame = false;
        self.frames_presented += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use input::Key;
    use renderer_2d::graphics::Command;

    use super::*;

    #[test]
    fn clock_advances_per_poll() {
        let mut platform = HeadlessPlatform::new().with_frame_time(Duration::from_millis(10));
        assert_eq!(platform.elapsed(), Duration::ZERO);
        platform.poll_events();
        platform.poll_events();
        assert_eq!(platform.elapsed(), Duration::from_millis(20));
    }

    #[test]
    fn closes_after_frame_limit() {
        let mut platform = HeadlessPlatform::new().with_frame_limit(2);
        for _ in 0..2 {
            assert!(!platform.should_close());
            platform.begin_frame().unwrap();
            platform.present().unwrap();
        }
        assert!(platform.should_close());
        assert_eq!(platform.frames_presented(), 2);
    }

    #[test]
    fn scripted_events_arrive_on_their_frame() {
        let mut platform = HeadlessPlatform::new()
            .with_event(1, Event::key_press(Key::W))
            .with_event(0, Event::WindowGainFocus);

        assert_eq!(platform.poll_events(), vec![Event::WindowGainFocus]);
        assert!(platform.poll_events().is_empty());

        platform.begin_frame().unwrap();
        platform.present().unwrap();
        assert_eq!(platform.poll_events(), vec![Event::key_press(Key::W)]);
    }

    #[test]
    fn window_close_event_closes() {
        let mut platform = HeadlessPlatform::new().with_event(0, Event::WindowClose);
        assert!(!platform.should_close());
        platform.poll_events();
        assert!(platform.should_close());
    }

    #[test]
    fn frames_must_be_balanced() {
        let mut platform = HeadlessPlatform::new();
        assert!(platform.present().is_err());
        platform.begin_frame().unwrap();
        assert!(platform.begin_frame().is_err());
        platform.present().unwrap();
        assert_eq!(platform.context().commands(), &[Command::Clear]);
    }

    #[test]
    fn command_log_stays_bounded() {
        let mut platform = HeadlessPlatform::new().with_command_limit(8);
        for _ in 0..1000 {
            platform.poll_events();
            platform.begin_frame().unwrap();
            platform.present().unwrap();
        }
        assert!(platform.context().commands().len() < 16);
        assert_eq!(platform.frames_presented(), 1000);
    }
}
