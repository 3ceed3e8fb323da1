use std::time::Duration;

use input::{EventBus, InputSystem};
use renderer_2d::graphics::{GraphicsContext, GraphicsError, ShaderId};
use renderer_2d::{AssetStore, ShaderSource, Texture};

use crate::scene::Scene;

/// Everything a scene may touch during one of its hooks.
pub struct ApplicationContext<'a> {
    graphics: &'a mut dyn GraphicsContext,
    input: &'a InputSystem,
    events: &'a mut EventBus,
    assets: &'a mut AssetStore,
    delta_time: Duration,
    frame: u64,

    close_requested: bool,
    next_scene: Option<Box<dyn Scene>>,
}

impl<'a> ApplicationContext<'a> {
    pub fn new(
        graphics: &'a mut dyn GraphicsContext,
        input: &'a InputSystem,
        events: &'a mut EventBus,
        assets: &'a mut AssetStore,
        delta_time: Duration,
        frame: u64,
    ) -> Self {
        Self {
            graphics,
            input,
            events,
            assets,
            delta_time,
            frame,
            close_requested: false,
            next_scene: None,
        }
    }

    pub fn graphics(&mut self) -> &mut dyn GraphicsContext {
        &mut *self.graphics
    }

    pub fn input(&self) -> &InputSystem {
        self.input
    }

    pub fn events(&mut self) -> &mut EventBus {
        &mut *self.events
    }

    pub fn assets(&self) -> &AssetStore {
        &*self.assets
    }

    /// Compiles `source` once and caches it under `name`.
    pub fn load_shader(
        &mut self,
        name: &str,
        source: &ShaderSource,
    ) -> Result<ShaderId, GraphicsError> {
        self.assets.shader(&mut *self.graphics, name, source)
    }

    /// Creates an RGBA8 texture once and caches it under `name`.
    pub fn load_texture(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Texture, GraphicsError> {
        self.assets
            .texture(&mut *self.graphics, name, width, height, pixels)
    }

    /// Time since the previous frame.
    pub fn delta_time(&self) -> Duration {
        self.delta_time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Stops the frame loop after the current hook returns.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    /// Replaces the running scene once the current hook returns.
    pub fn set_scene(&mut self, scene: Box<dyn Scene>) {
        self.next_scene = Some(scene);
    }

    pub(crate) fn take_next_scene(&mut self) -> Option<Box<dyn Scene>> {
        self.next_scene.take()
    }
}
