//! Batched 2D quad renderer.
//!
//! Entities are packed into fixed-capacity [`RenderBatch`]es that share one
//! z-index and up to [`MAX_TEXTURES`] textures, so every batch renders with a
//! single draw call. The [`Renderer`] owns the batches of a scene and decides
//! where each new entity goes.

mod asset;
mod batch;
mod component;
mod entity;
mod error;
pub mod graphics;
mod renderer;
mod shader;
mod stage;
mod texture;
mod transform;

pub use asset::AssetStore;
pub use batch::{
    quad_indices, quad_layout, RenderBatch, MAX_TEXTURES, QUAD_INDICES, QUAD_SIZE, QUAD_VERTICES,
    VERTEX_SIZE,
};
pub use component::{Color, Component, ComponentKind, WHITE};
pub use entity::Entity;
pub use error::{Error, Result};
pub use renderer::{EntityHandle, Renderer, BATCH_CAPACITY};
pub use shader::{ShaderSource, UNIFORM_PROJECTION, UNIFORM_TEXTURES, UNIFORM_VIEW};
pub use stage::Stage;
pub use texture::{Sprite, Spritesheet, Texture, TextureHandle, FULL_TEX_COORDS};
pub use transform::Transform;

pub use camera::Camera;
