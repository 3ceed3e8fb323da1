use camera::Camera;

use crate::entity::Entity;
use crate::error::Result;
use crate::graphics::GraphicsContext;
use crate::renderer::{EntityHandle, Renderer};

/// What a scene renders: its batch pool and the camera it is seen through.
#[derive(Debug)]
pub struct Stage {
    renderer: Renderer,
    camera: Camera,
}

impl Stage {
    pub fn new(renderer: Renderer, camera: Camera) -> Self {
        Self { renderer, camera }
    }

    pub fn add_entity<G>(&mut self, ctx: &mut G, entity: Entity) -> Result<EntityHandle>
    where
        G: GraphicsContext + ?Sized,
    {
        self.renderer.add(ctx, entity)
    }

    pub fn entity(&self, handle: EntityHandle) -> Result<&Entity> {
        self.renderer.entity(handle)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity> {
        self.renderer.entity_mut(handle)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn render<G>(&mut self, ctx: &mut G) -> Result<()>
    where
        G: GraphicsContext + ?Sized,
    {
        self.renderer.render(ctx, &self.camera)
    }

    pub fn destroy<G>(&mut self, ctx: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        self.renderer.destroy(ctx);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector2, Vector3, Vector4};

    use super::*;
    use crate::graphics::{HeadlessContext, UniformValue};
    use crate::shader::{ShaderSource, UNIFORM_VIEW};

    #[test]
    fn renders_through_its_camera() {
        let mut ctx = HeadlessContext::new();
        let shader = ShaderSource::quad().compile(&mut ctx).unwrap();
        let mut stage = Stage::new(Renderer::new(shader), Camera::with_viewport(320.0, 240.0));

        let handle = stage
            .add_entity(
                &mut ctx,
                Entity::new(0)
                    .with_position(Vector2::new(8.0, 8.0))
                    .with_color(Vector4::new(1.0, 0.0, 0.0, 1.0)),
            )
            .unwrap();
        stage.camera_mut().set_position(Vector3::new(5.0, 0.0, 0.0));
        stage.render(&mut ctx).unwrap();

        assert_eq!(
            ctx.uniform(shader, UNIFORM_VIEW),
            Some(&UniformValue::Mat4(stage.camera().view()))
        );
        assert_eq!(ctx.draw_calls().len(), 1);
        assert_eq!(
            stage.entity(handle).unwrap().color(),
            Some(Vector4::new(1.0, 0.0, 0.0, 1.0))
        );
    }

    #[test]
    fn entity_edits_reach_next_frame() {
        let mut ctx = HeadlessContext::new();
        let mut stage = Stage::new(
            Renderer::new(crate::graphics::ShaderId(1)),
            Camera::default(),
        );
        let handle = stage.add_entity(&mut ctx, Entity::new(0)).unwrap();
        stage.render(&mut ctx).unwrap();

        stage
            .entity_mut(handle)
            .unwrap()
            .set_scale(Vector2::new(4.0, 4.0));
        ctx.take_commands();
        stage.render(&mut ctx).unwrap();

        let batch = &stage.renderer().batches()[handle.batch()];
        assert_eq!(ctx.upload_count(), 1);
        assert_eq!(&batch.vertices()[0..2], &[4.0, 4.0]);
    }
}
