use std::borrow::Cow;
use std::time::{Duration, Instant};

use log::{log_enabled, Level};

/// Scope timer: logs the time spent between its creation and its drop.
///
/// Used through the [`TIME!`](crate::TIME) macro, which compiles to nothing in
/// release builds.
#[derive(Debug)]
pub struct Timing<'a> {
    start: Instant,
    level: Level,
    label: Cow<'a, str>,
}

impl<'a> Default for Timing<'a> {
    fn default() -> Self {
        Self {
            start: Instant::now(),
            level: Level::Trace,
            label: "TIME!".into(),
        }
    }
}

impl<'a> Timing<'a> {
    pub fn new<N>(label: N) -> Self
    where
        N: Into<Cow<'a, str>>,
    {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<'a> Drop for Timing<'a> {
    fn drop(&mut self) {
        if log_enabled!(self.level) {
            log::log!(self.level, "[{:?}] {}", self.elapsed(), self.label);
        }
    }
}

#[macro_export]
#[cfg(debug_assertions)]
macro_rules! TIME {
    () => {
        let _timing = $crate::debug::Timing::default();
    };
    ($label:expr) => {
        let _timing = $crate::debug::Timing::new($label);
    };
    ($($arg:expr),*) => {
        let _timing = $crate::debug::Timing::new(format!($($arg),*));
    };
}
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! TIME {
    () => {
        ()
    };
    ($label: expr) => {
        ()
    };
    ($($arg:expr),*) => {
        ()
    };
}
