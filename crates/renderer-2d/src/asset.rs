use std::collections::HashMap;

use log::debug;

use crate::graphics::{GraphicsContext, GraphicsError, ShaderId};
use crate::shader::ShaderSource;
use crate::texture::Texture;

/// Name-keyed cache of shaders and textures.
///
/// Loading the same name twice hands back the handle created the first time,
/// so every entity referring to a texture by name shares one handle.
#[derive(Debug, Default)]
pub struct AssetStore {
    shaders: HashMap<String, ShaderId>,
    textures: HashMap<String, Texture>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shader<G>(
        &mut self,
        ctx: &mut G,
        name: &str,
        source: &ShaderSource,
    ) -> Result<ShaderId, GraphicsError>
    where
        G: GraphicsContext + ?Sized,
    {
        if let Some(shader) = self.shaders.get(name) {
            return Ok(*shader);
        }
        let shader = source.compile(ctx)?;
        debug!("asset store: shader '{name}' -> {:?}", shader);
        self.shaders.insert(name.to_owned(), shader);
        Ok(shader)
    }

    /// Returns the texture cached under `name`, creating it from `width *
    /// height` RGBA8 `pixels` on first use.
    pub fn texture<G>(
        &mut self,
        ctx: &mut G,
        name: &str,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<Texture, GraphicsError>
    where
        G: GraphicsContext + ?Sized,
    {
        if let Some(texture) = self.textures.get(name) {
            return Ok(*texture);
        }
        let handle = ctx.create_texture(width, height, pixels)?;
        let texture = Texture::new(handle, width, height);
        debug!("asset store: texture '{name}' -> {:?}", handle);
        self.textures.insert(name.to_owned(), texture);
        Ok(texture)
    }

    pub fn get_shader(&self, name: &str) -> Option<ShaderId> {
        self.shaders.get(name).copied()
    }

    pub fn get_texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::HeadlessContext;

    #[test]
    fn textures_are_cached_by_name() {
        let mut ctx = HeadlessContext::new();
        let mut store = AssetStore::new();
        let first = store.texture(&mut ctx, "tiles", 1, 1, &[0; 4]).unwrap();
        let second = store.texture(&mut ctx, "tiles", 1, 1, &[0; 4]).unwrap();
        let other = store.texture(&mut ctx, "hero", 1, 1, &[0; 4]).unwrap();

        assert_eq!(first, second);
        assert_ne!(first.handle, other.handle);
        assert_eq!(store.get_texture("tiles"), Some(first));
        assert_eq!(store.get_texture("missing"), None);
    }

    #[test]
    fn shaders_are_cached_by_name() {
        let mut ctx = HeadlessContext::new();
        let mut store = AssetStore::new();
        let source = ShaderSource::quad();
        let first = store.shader(&mut ctx, "quad", &source).unwrap();
        let second = store.shader(&mut ctx, "quad", &source).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.get_shader("quad"), Some(first));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut ctx = HeadlessContext::new();
        let mut store = AssetStore::new();
        assert!(store.texture(&mut ctx, "bad", 2, 2, &[0; 3]).is_err());
        assert_eq!(store.get_texture("bad"), None);
    }
}
