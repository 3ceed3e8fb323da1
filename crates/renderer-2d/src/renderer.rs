use camera::Camera;
use foundation::TIME;
use log::{debug, error};

use crate::batch::RenderBatch;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::graphics::{GraphicsContext, ShaderId};

/// Quads per batch unless configured otherwise.
pub const BATCH_CAPACITY: usize = 1000;

/// Where an entity lives once handed to the [`Renderer`]: the batch, in
/// creation order, and the slot inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    batch: usize,
    slot: usize,
}

impl EntityHandle {
    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

/// Pool of render batches for one scene.
///
/// Entities go to the first batch, in creation order, that has room, the same
/// z-index and either knows the entity texture or can still take a new one.
/// Batches are never merged nor removed, so texture variety can leave several
/// partially filled batches behind.
#[derive(Debug)]
pub struct Renderer {
    shader: ShaderId,
    batch_capacity: usize,
    batches: Vec<RenderBatch>,
}

impl Renderer {
    pub fn new(shader: ShaderId) -> Self {
        Self {
            shader,
            batch_capacity: BATCH_CAPACITY,
            batches: Vec::new(),
        }
    }

    pub fn with_batch_capacity(mut self, batch_capacity: usize) -> Self {
        self.batch_capacity = batch_capacity.max(1);
        self
    }

    pub fn add<G>(&mut self, ctx: &mut G, entity: Entity) -> Result<EntityHandle>
    where
        G: GraphicsContext + ?Sized,
    {
        let batch = match self.batches.iter().position(|batch| batch.accepts(&entity)) {
            Some(batch) => batch,
            None => {
                let batch = RenderBatch::new(ctx, self.batch_capacity, entity.z())?;
                self.batches.push(batch);
                debug!(
                    "renderer: batch #{} for z={} ({} batches)",
                    self.batches.len() - 1,
                    entity.z(),
                    self.batches.len()
                );
                self.batches.len() - 1
            }
        };
        let slot = self.batches[batch].add_entity(entity)?;

        Ok(EntityHandle { batch, slot })
    }

    /// Renders every batch, lowest z first. Batches with equal z keep their
    /// creation order.
    pub fn render<G>(&mut self, ctx: &mut G, camera: &Camera) -> Result<()>
    where
        G: GraphicsContext + ?Sized,
    {
        TIME!("Renderer.render");
        for index in self.render_order() {
            if let Err(e) = self.batches[index].render(ctx, self.shader, camera) {
                error!("render batch #{index}: {e}");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Batch indices sorted by ascending z (stable).
    pub fn render_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.batches.len()).collect();
        order.sort_by_key(|&index| self.batches[index].z());
        order
    }

    pub fn destroy<G>(&mut self, ctx: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        for batch in self.batches.drain(..) {
            batch.destroy(ctx);
        }
    }

    pub fn entity(&self, handle: EntityHandle) -> Result<&Entity> {
        self.batches
            .get(handle.batch)
            .and_then(|batch| batch.entity(handle.slot))
            .ok_or(Error::InvalidHandle(handle))
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut Entity> {
        self.batches
            .get_mut(handle.batch)
            .and_then(|batch| batch.entity_mut(handle.slot))
            .ok_or(Error::InvalidHandle(handle))
    }

    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    pub fn shader(&self) -> ShaderId {
        self.shader
    }

    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }

    pub fn entity_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::len).sum()
    }
}
