//! Interface to the graphics context the renderer submits to.
//!
//! Context creation and the actual API calls live outside of this crate: the
//! renderer only relies on the [`GraphicsContext`] trait. [`HeadlessContext`]
//! implements it by recording every call, which is what tests, benches and
//! the sandbox run against.

mod headless;

use std::fmt;

use cgmath::{Matrix4, Vector2, Vector4};
use thiserror::Error;

pub use headless::{Command, HeadlessContext, UniformValue};

use crate::texture::TextureHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Handle to a compiled and linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
            ShaderStage::Link => write!(f, "link"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphicsError {
    #[error("{stage} shader failed: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("unknown buffer {0:?}")]
    UnknownBuffer(BufferId),

    #[error("upload of {len} floats at offset {offset} overflows buffer of {size} floats")]
    UploadOutOfBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    #[error("invalid texture: {0}")]
    InvalidTexture(String),

    #[error("{0}")]
    Backend(String),
}

/// Value written to a named shader uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Uniform<'a> {
    Int(i32),
    Float(f32),
    Vec2(Vector2<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
    IntArray(&'a [i32]),
}

/// Data type of one vertex attribute, all components are `f32`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeType {
    Float,
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    pub const fn components(self) -> usize {
        match self {
            AttributeType::Float => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub ty: AttributeType,
    /// Offset in floats from the start of the vertex.
    pub offset: usize,
}

/// Interleaved vertex layout, one binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    pub fn new(types: &[AttributeType]) -> Self {
        let mut offset = 0;
        let attributes = types
            .iter()
            .enumerate()
            .map(|(location, &ty)| {
                let attribute = VertexAttribute {
                    location: location as u32,
                    ty,
                    offset,
                };
                offset += ty.components();
                attribute
            })
            .collect();
        Self { attributes }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Size of one vertex in floats.
    pub fn stride(&self) -> usize {
        self.attributes.iter().map(|a| a.ty.components()).sum()
    }
}

/// What the renderer needs from the graphics API.
pub trait GraphicsContext {
    fn compile_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderId, GraphicsError>;

    /// Uploads `width * height` RGBA8 pixels.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, GraphicsError>;

    /// Allocates a dynamic vertex buffer of `float_count` floats, zeroed.
    fn create_vertex_buffer(
        &mut self,
        layout: &VertexLayout,
        float_count: usize,
    ) -> Result<BufferId, GraphicsError>;

    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<BufferId, GraphicsError>;

    /// Writes `data` into the buffer starting at float `offset`.
    fn upload_vertices(
        &mut self,
        buffer: BufferId,
        offset: usize,
        data: &[f32],
    ) -> Result<(), GraphicsError>;

    fn delete_buffer(&mut self, buffer: BufferId);

    fn bind_shader(&mut self, shader: ShaderId);

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: Uniform<'_>);

    fn bind_texture(&mut self, texture: TextureHandle, slot: u32);

    /// Issues one indexed triangle-list draw.
    fn draw_indexed(
        &mut self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        index_count: usize,
    ) -> Result<(), GraphicsError>;

    /// Clears the color and depth targets.
    fn clear(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_offsets_and_stride() {
        let layout = VertexLayout::new(&[
            AttributeType::Vec2,
            AttributeType::Vec4,
            AttributeType::Vec2,
            AttributeType::Float,
        ]);
        let offsets: Vec<_> = layout.attributes().iter().map(|a| a.offset).collect();
        let locations: Vec<_> = layout.attributes().iter().map(|a| a.location).collect();
        assert_eq!(offsets, vec![0, 2, 6, 8]);
        assert_eq!(locations, vec![0, 1, 2, 3]);
        assert_eq!(layout.stride(), 9);
    }
}
