use camera::Camera;
use cgmath::Vector2;
use foundation::TIME;
use log::{debug, error, trace};

use crate::component::WHITE;
use crate::entity::Entity;
use crate::error::{Error, Result};
use crate::graphics::{AttributeType, BufferId, GraphicsContext, ShaderId, Uniform, VertexLayout};
use crate::shader::{UNIFORM_PROJECTION, UNIFORM_TEXTURES, UNIFORM_VIEW};
use crate::texture::{Sprite, TextureHandle};

/// Floats per vertex: position (2), color (4), uv (2), texture slot (1).
pub const VERTEX_SIZE: usize = 9;
pub const QUAD_VERTICES: usize = 4;
pub const QUAD_INDICES: usize = 6;
/// Floats per quad.
pub const QUAD_SIZE: usize = VERTEX_SIZE * QUAD_VERTICES;
/// Distinct textures one batch can sample from.
pub const MAX_TEXTURES: usize = 8;

const BASE_INDICES: [u32; QUAD_INDICES] = [0, 3, 1, 1, 3, 2];

// Corner offsets relative to scale, in the winding BASE_INDICES expects.
const QUAD_CORNERS: [Vector2<f32>; QUAD_VERTICES] = [
    Vector2::new(1.0, 1.0),
    Vector2::new(1.0, 0.0),
    Vector2::new(0.0, 0.0),
    Vector2::new(0.0, 1.0),
];

// Sampler unit per texture slot. Unit 0 never has a texture bound.
const TEXTURE_SLOTS: [i32; MAX_TEXTURES + 1] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

pub fn quad_layout() -> VertexLayout {
    VertexLayout::new(&[
        AttributeType::Vec2,
        AttributeType::Vec4,
        AttributeType::Vec2,
        AttributeType::Float,
    ])
}

/// Index data for `capacity` quads: `BASE_INDICES` shifted by 4 per quad.
pub fn quad_indices(capacity: usize) -> Vec<u32> {
    (0..capacity)
        .flat_map(|quad| {
            let base = (quad * QUAD_VERTICES) as u32;
            BASE_INDICES.iter().map(move |i| base + i)
        })
        .collect()
}

/// Fixed-capacity block of quads that share one z-index, at most
/// [`MAX_TEXTURES`] textures and a single draw call.
///
/// The entity at slot `k` owns floats `[k * QUAD_SIZE, (k + 1) * QUAD_SIZE)`
/// of the vertex array. Unused slots stay zeroed and draw as degenerate
/// triangles.
#[derive(Debug)]
pub struct RenderBatch {
    capacity: usize,
    z: i32,

    vertices: Vec<f32>,
    entities: Vec<Entity>,
    textures: Vec<TextureHandle>,

    vertex_buffer: BufferId,
    index_buffer: BufferId,

    // vertex data changed since the last upload
    pending_upload: bool,
}

impl RenderBatch {
    pub fn new<G>(ctx: &mut G, capacity: usize, z: i32) -> Result<Self>
    where
        G: GraphicsContext + ?Sized,
    {
        let vertices = vec![0.0; capacity * QUAD_SIZE];
        let vertex_buffer = ctx.create_vertex_buffer(&quad_layout(), vertices.len())?;
        let index_buffer = match ctx.create_index_buffer(&quad_indices(capacity)) {
            Ok(buffer) => buffer,
            Err(e) => {
                ctx.delete_buffer(vertex_buffer);
                return Err(e.into());
            }
        };
        debug!("created render batch: capacity={capacity} z={z}");

        Ok(Self {
            capacity,
            z,
            vertices,
            entities: Vec::with_capacity(capacity),
            textures: Vec::with_capacity(MAX_TEXTURES),
            vertex_buffer,
            index_buffer,
            pending_upload: false,
        })
    }

    /// Places the entity in the next free slot and packs its quad.
    ///
    /// Fails without side effects when the batch is full or when the entity
    /// brings a new texture while the texture table is full.
    pub fn add_entity(&mut self, mut entity: Entity) -> Result<usize> {
        if self.is_full() {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let texture_slot = resolve_texture_slot(&mut self.textures, entity.sprite())?;

        let slot = self.entities.len();
        pack_quad(&mut self.vertices, slot, &entity, texture_slot);
        entity.set_dirty(false);
        self.entities.push(entity);
        self.pending_upload = true;

        Ok(slot)
    }

    /// Re-packs dirty entities, uploads the vertex array if anything changed
    /// and issues the draw call.
    pub fn render<G>(&mut self, ctx: &mut G, shader: ShaderId, camera: &Camera) -> Result<()>
    where
        G: GraphicsContext + ?Sized,
    {
        TIME!("RenderBatch.render");

        for (slot, entity) in self.entities.iter_mut().enumerate() {
            if !entity.is_dirty() {
                continue;
            }
            // a sprite swapped to a texture the full table can't take draws untextured
            let texture_slot = match resolve_texture_slot(&mut self.textures, entity.sprite()) {
                Ok(texture_slot) => texture_slot,
                Err(e) => {
                    error!("batch z={} slot {slot}: {e}, drawing untextured", self.z);
                    0.0
                }
            };
            pack_quad(&mut self.vertices, slot, entity, texture_slot);
            entity.set_dirty(false);
            self.pending_upload = true;
        }

        if self.pending_upload {
            ctx.upload_vertices(self.vertex_buffer, 0, &self.vertices)?;
            self.pending_upload = false;
            trace!("batch z={} uploaded {} floats", self.z, self.vertices.len());
        }

        ctx.bind_shader(shader);
        ctx.set_uniform(shader, UNIFORM_PROJECTION, Uniform::Mat4(camera.projection()));
        ctx.set_uniform(shader, UNIFORM_VIEW, Uniform::Mat4(camera.view()));
        for (i, texture) in self.textures.iter().enumerate() {
            ctx.bind_texture(*texture, i as u32 + 1);
        }
        ctx.set_uniform(shader, UNIFORM_TEXTURES, Uniform::IntArray(&TEXTURE_SLOTS));

        ctx.draw_indexed(
            self.vertex_buffer,
            self.index_buffer,
            self.capacity * QUAD_INDICES,
        )?;

        Ok(())
    }

    pub fn destroy<G>(self, ctx: &mut G)
    where
        G: GraphicsContext + ?Sized,
    {
        debug!("destroying render batch z={}", self.z);
        ctx.delete_buffer(self.vertex_buffer);
        ctx.delete_buffer(self.index_buffer);
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() == self.capacity
    }

    pub fn is_texture_store_full(&self) -> bool {
        self.textures.len() >= MAX_TEXTURES
    }

    pub fn contains_texture(&self, texture: TextureHandle) -> bool {
        self.textures.contains(&texture)
    }

    /// Whether the entity could join this batch without breaking its z-index
    /// or its texture budget.
    pub fn accepts(&self, entity: &Entity) -> bool {
        let texture_fits = entity.sprite().map_or(true, |sprite| {
            self.contains_texture(sprite.handle()) || !self.is_texture_store_full()
        });
        !self.is_full() && self.z == entity.z() && texture_fits
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn vertex_buffer(&self) -> BufferId {
        self.vertex_buffer
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, slot: usize) -> Option<&Entity> {
        self.entities.get(slot)
    }

    pub fn entity_mut(&mut self, slot: usize) -> Option<&mut Entity> {
        self.entities.get_mut(slot)
    }
}

/// Texture slot written into the vertices: 0 without a sprite, otherwise the
/// 1-based position of the sprite texture in the table, inserting it if
/// needed.
fn resolve_texture_slot(
    textures: &mut Vec<TextureHandle>,
    sprite: Option<&Sprite>,
) -> Result<f32> {
    let Some(sprite) = sprite else {
        return Ok(0.0);
    };
    let texture = sprite.handle();
    let index = match textures.iter().position(|t| *t == texture) {
        Some(index) => index,
        None => {
            if textures.len() >= MAX_TEXTURES {
                return Err(Error::TextureStoreFull { texture });
            }
            textures.push(texture);
            textures.len() - 1
        }
    };
    Ok((index + 1) as f32)
}

fn pack_quad(vertices: &mut [f32], slot: usize, entity: &Entity, texture_slot: f32) {
    let position = entity.transform().position();
    let scale = entity.transform().scale();
    let color = entity.color().unwrap_or(WHITE);
    let tex_coords = entity.sprite().map(|sprite| sprite.tex_coords);

    let quad = &mut vertices[slot * QUAD_SIZE..(slot + 1) * QUAD_SIZE];
    for (i, vertex) in quad.chunks_exact_mut(VERTEX_SIZE).enumerate() {
        let corner = QUAD_CORNERS[i];
        let uv = tex_coords.map_or(Vector2::new(0.0, 0.0), |uvs| uvs[i]);

        vertex[0] = position.x + corner.x * scale.x;
        vertex[1] = position.y + corner.y * scale.y;
        vertex[2] = color.x;
        vertex[3] = color.y;
        vertex[4] = color.z;
        vertex[5] = color.w;
        vertex[6] = uv.x;
        vertex[7] = uv.y;
        vertex[8] = texture_slot;
    }
}
