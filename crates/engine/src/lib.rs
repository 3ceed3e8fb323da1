mod context;
pub mod engine;
mod frame_counter;
mod platform;
mod scene;

use std::{error, result};

pub use context::ApplicationContext;
pub use engine::{Engine, EngineBuilder, EngineConfig};
pub use frame_counter::{
    ExponentialMovingAverage, FixedTimestep, FpsPrinter, FrameCounter, MovingAverage,
};
pub use platform::{HeadlessPlatform, Platform};
pub use scene::{Scene, SceneManager};

pub type Result<T> = result::Result<T, Box<dyn error::Error>>;
