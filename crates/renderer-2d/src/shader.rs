use log::{debug, error};

use crate::graphics::{GraphicsContext, GraphicsError, ShaderId};

const QUAD_VERTEX_SHADER: &str = include_str!("../assets/shaders/quad.vert");
const QUAD_FRAGMENT_SHADER: &str = include_str!("../assets/shaders/quad.frag");

pub const UNIFORM_PROJECTION: &str = "u_Projection";
pub const UNIFORM_VIEW: &str = "u_View";
pub const UNIFORM_TEXTURES: &str = "u_Textures";

/// GLSL sources of a shader program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSource {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// The bundled shader for batched quads.
    pub fn quad() -> Self {
        Self::new(QUAD_VERTEX_SHADER, QUAD_FRAGMENT_SHADER)
    }

    /// Compiles and links the program. Failures are logged with the driver
    /// info log before being returned.
    pub fn compile<G>(&self, ctx: &mut G) -> Result<ShaderId, GraphicsError>
    where
        G: GraphicsContext + ?Sized,
    {
        match ctx.compile_shader(&self.vertex, &self.fragment) {
            Ok(shader) => {
                debug!("compiled shader {:?}", shader);
                Ok(shader)
            }
            Err(e) => {
                error!("shader compilation failed: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{HeadlessContext, ShaderStage};

    #[test]
    fn bundled_quad_shader_declares_uniforms() {
        let source = ShaderSource::quad();
        assert!(source.vertex.contains(UNIFORM_PROJECTION));
        assert!(source.vertex.contains(UNIFORM_VIEW));
        assert!(source.fragment.contains(UNIFORM_TEXTURES));
    }

    #[test]
    fn bundled_quad_shader_compiles() {
        let mut ctx = HeadlessContext::new();
        assert!(ShaderSource::quad().compile(&mut ctx).is_ok());
    }

    #[test]
    fn compile_failure_is_reported() {
        let mut ctx = HeadlessContext::new();
        let err = ShaderSource::new("", "void main() {}")
            .compile(&mut ctx)
            .unwrap_err();
        assert!(matches!(
            err,
            GraphicsError::ShaderCompile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
    }
}
