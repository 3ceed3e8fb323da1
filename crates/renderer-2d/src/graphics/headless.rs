use std::collections::HashMap;

use cgmath::{Matrix4, Vector2, Vector4};
use log::{debug, trace};

use super::{
    BufferId, GraphicsContext, GraphicsError, ShaderId, ShaderStage, Uniform, VertexLayout,
};
use crate::texture::TextureHandle;

/// One recorded call on a [`HeadlessContext`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CompileShader(ShaderId),
    CreateTexture {
        texture: TextureHandle,
        width: u32,
        height: u32,
    },
    CreateVertexBuffer {
        buffer: BufferId,
        floats: usize,
    },
    CreateIndexBuffer {
        buffer: BufferId,
        indices: usize,
    },
    UploadVertices {
        buffer: BufferId,
        offset: usize,
        len: usize,
    },
    DeleteBuffer(BufferId),
    BindShader(ShaderId),
    SetUniform {
        shader: ShaderId,
        name: String,
    },
    BindTexture {
        texture: TextureHandle,
        slot: u32,
    },
    DrawIndexed {
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        index_count: usize,
    },
    Clear,
}

/// Owned copy of the last value written to a uniform.
#[derive(Clone, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2(Vector2<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
    IntArray(Vec<i32>),
}

impl From<Uniform<'_>> for UniformValue {
    fn from(value: Uniform<'_>) -> Self {
        match value {
            Uniform::Int(v) => UniformValue::Int(v),
            Uniform::Float(v) => UniformValue::Float(v),
            Uniform::Vec2(v) => UniformValue::Vec2(v),
            Uniform::Vec4(v) => UniformValue::Vec4(v),
            Uniform::Mat4(v) => UniformValue::Mat4(v),
            Uniform::IntArray(v) => UniformValue::IntArray(v.to_vec()),
        }
    }
}

/// Graphics context that keeps buffers in memory and records every call.
///
/// The command log grows until drained with [`take_commands`] unless a limit
/// is set with [`with_command_limit`], in which case the oldest commands are
/// discarded.
///
/// [`take_commands`]: HeadlessContext::take_commands
/// [`with_command_limit`]: HeadlessContext::with_command_limit
#[derive(Debug, Default)]
pub struct HeadlessContext {
    next_id: u32,

    vertex_buffers: HashMap<BufferId, Vec<f32>>,
    index_buffers: HashMap<BufferId, Vec<u32>>,
    textures: HashMap<TextureHandle, (u32, u32)>,
    uniforms: HashMap<(ShaderId, String), UniformValue>,
    bound_textures: HashMap<u32, TextureHandle>,
    bound_shader: Option<ShaderId>,

    commands: Vec<Command>,
    command_limit: Option<usize>,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at least the `limit` most recent commands and never more than
    /// twice that.
    pub fn with_command_limit(mut self, limit: usize) -> Self {
        self.command_limit = Some(limit.max(1));
        self
    }

    fn record(&mut self, command: Command) {
        self.commands.push(command);
        if let Some(limit) = self.command_limit {
            if self.commands.len() >= limit * 2 {
                let excess = self.commands.len() - limit;
                self.commands.drain(..excess);
            }
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drains the recorded commands, typically once per frame.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn upload_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::UploadVertices { .. }))
            .count()
    }

    /// Recorded draws as `(vertex_buffer, index_count)`, in submission order.
    pub fn draw_calls(&self) -> Vec<(BufferId, usize)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawIndexed {
                    vertex_buffer,
                    index_count,
                    ..
                } => Some((*vertex_buffer, *index_count)),
                _ => None,
            })
            .collect()
    }

    pub fn vertex_data(&self, buffer: BufferId) -> Option<&[f32]> {
        self.vertex_buffers.get(&buffer).map(Vec::as_slice)
    }

    pub fn index_data(&self, buffer: BufferId) -> Option<&[u32]> {
        self.index_buffers.get(&buffer).map(Vec::as_slice)
    }

    pub fn uniform(&self, shader: ShaderId, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(&(shader, name.to_owned()))
    }

    pub fn bound_texture(&self, slot: u32) -> Option<TextureHandle> {
        self.bound_textures.get(&slot).copied()
    }

    pub fn bound_shader(&self) -> Option<ShaderId> {
        self.bound_shader
    }

    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&texture).copied()
    }

    pub fn buffer_count(&self) -> usize {
        self.vertex_buffers.len() + self.index_buffers.len()
    }
}

fn check_stage(stage: ShaderStage, source: &str) -> Result<(), GraphicsError> {
    if source.trim().is_empty() {
        return Err(GraphicsError::ShaderCompile {
            stage,
            log: "empty shader source".to_owned(),
        });
    }
    if !source.contains("void main") {
        return Err(GraphicsError::ShaderCompile {
            stage,
            log: "missing entry point 'main'".to_owned(),
        });
    }
    Ok(())
}

impl GraphicsContext for HeadlessContext {
    fn compile_shader(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderId, GraphicsError> {
        check_stage(ShaderStage::Vertex, vertex_source)?;
        check_stage(ShaderStage::Fragment, fragment_source)?;
        let shader = ShaderId(self.next_id());
        debug!("headless: compiled {:?}", shader);
        self.record(Command::CompileShader(shader));
        Ok(shader)
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<TextureHandle, GraphicsError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(GraphicsError::InvalidTexture(format!(
                "{width}x{height} RGBA texture needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        let texture = TextureHandle(self.next_id());
        self.textures.insert(texture, (width, height));
        self.record(Command::CreateTexture {
            texture,
            width,
            height,
        });
        Ok(texture)
    }

    fn create_vertex_buffer(
        &mut self,
        layout: &VertexLayout,
        float_count: usize,
    ) -> Result<BufferId, GraphicsError> {
        if layout.stride() == 0 || float_count % layout.stride() != 0 {
            return Err(GraphicsError::Backend(format!(
                "vertex buffer of {float_count} floats does not match stride {}",
                layout.stride()
            )));
        }
        let buffer = BufferId(self.next_id());
        self.vertex_buffers.insert(buffer, vec![0.0; float_count]);
        self.record(Command::CreateVertexBuffer {
            buffer,
            floats: float_count,
        });
        Ok(buffer)
    }

    fn create_index_buffer(&mut self, indices: &[u32]) -> Result<BufferId, GraphicsError> {
        let buffer = BufferId(self.next_id());
        self.index_buffers.insert(buffer, indices.to_vec());
        self.record(Command::CreateIndexBuffer {
            buffer,
            indices: indices.len(),
        });
        Ok(buffer)
    }

    fn upload_vertices(
        &mut self,
        buffer: BufferId,
        offset: usize,
        data: &[f32],
    ) -> Result<(), GraphicsError> {
        let storage = self
            .vertex_buffers
            .get_mut(&buffer)
            .ok_or(GraphicsError::UnknownBuffer(buffer))?;
        let end = offset + data.len();
        if end > storage.len() {
            return Err(GraphicsError::UploadOutOfBounds {
                offset,
                len: data.len(),
                size: storage.len(),
            });
        }
        storage[offset..end].copy_from_slice(data);
        trace!("headless: uploaded {} floats to {:?}", data.len(), buffer);
        self.record(Command::UploadVertices {
            buffer,
            offset,
            len: data.len(),
        });
        Ok(())
    }

    fn delete_buffer(&mut self, buffer: BufferId) {
        self.vertex_buffers.remove(&buffer);
        self.index_buffers.remove(&buffer);
        self.record(Command::DeleteBuffer(buffer));
    }

    fn bind_shader(&mut self, shader: ShaderId) {
        self.bound_shader = Some(shader);
        self.record(Command::BindShader(shader));
    }

    fn set_uniform(&mut self, shader: ShaderId, name: &str, value: Uniform<'_>) {
        self.uniforms
            .insert((shader, name.to_owned()), UniformValue::from(value));
        self.record(Command::SetUniform {
            shader,
            name: name.to_owned(),
        });
    }

    fn bind_texture(&mut self, texture: TextureHandle, slot: u32) {
        self.bound_textures.insert(slot, texture);
        self.record(Command::BindTexture { texture, slot });
    }

    fn draw_indexed(
        &mut self,
        vertex_buffer: BufferId,
        index_buffer: BufferId,
        index_count: usize,
    ) -> Result<(), GraphicsError> {
        if !self.vertex_buffers.contains_key(&vertex_buffer) {
            return Err(GraphicsError::UnknownBuffer(vertex_buffer));
        }
        let indices = self
            .index_buffers
            .get(&index_buffer)
            .ok_or(GraphicsError::UnknownBuffer(index_buffer))?;
        if index_count > indices.len() {
            return Err(GraphicsError::Backend(format!(
                "draw of {index_count} indices exceeds index buffer of {}",
                indices.len()
            )));
        }
        self.record(Command::DrawIndexed {
            vertex_buffer,
            index_buffer,
            index_count,
        });
        Ok(())
    }

    fn clear(&mut self) {
        self.record(Command::Clear);
    }
}
