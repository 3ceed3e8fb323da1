use std::time::Duration;

use log::debug;

use crate::context::ApplicationContext;
use crate::Result;

/// Lifecycle hooks of a scene. `create` runs once before the first update and
/// `destroy` once when the scene is replaced or the engine stops.
pub trait Scene {
    fn create(&mut self, ctx: &mut ApplicationContext) -> Result<()>;
    fn update(&mut self, ctx: &mut ApplicationContext, delta_time: Duration) -> Result<()>;
    fn render(&mut self, ctx: &mut ApplicationContext) -> Result<()>;
    fn destroy(&mut self, ctx: &mut ApplicationContext);
}

/// Holds the running scene.
#[derive(Default)]
pub struct SceneManager {
    scene: Option<Box<dyn Scene>>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroys the current scene, if any, then creates `scene`.
    pub fn set_scene(
        &mut self,
        ctx: &mut ApplicationContext,
        mut scene: Box<dyn Scene>,
    ) -> Result<()> {
        self.clear(ctx);
        scene
            .create(ctx)
            .map_err(|e| format!("scene create: {e:?}"))?;
        debug!("scene manager: scene created");
        self.scene = Some(scene);
        Ok(())
    }

    pub fn has_scene(&self) -> bool {
        self.scene.is_some()
    }

    pub fn update(&mut self, ctx: &mut ApplicationContext, delta_time: Duration) -> Result<()> {
        match self.scene.as_mut() {
            Some(scene) => scene.update(ctx, delta_time),
            None => Ok(()),
        }
    }

    pub fn render(&mut self, ctx: &mut ApplicationContext) -> Result<()> {
        match self.scene.as_mut() {
            Some(scene) => scene.render(ctx),
            None => Ok(()),
        }
    }

    /// Destroys the current scene, if any.
    pub fn clear(&mut self, ctx: &mut ApplicationContext) {
        if let Some(mut scene) = self.scene.take() {
            scene.destroy(ctx);
            debug!("scene manager: scene destroyed");
        }
    }
}
