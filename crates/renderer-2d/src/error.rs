use thiserror::Error;

use crate::graphics::GraphicsError;
use crate::renderer::EntityHandle;
use crate::texture::TextureHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The batch already holds `capacity` entities.
    #[error("render batch has no more capacity ({capacity} quads)")]
    CapacityExceeded { capacity: usize },

    /// The batch texture table already holds its maximum number of textures.
    #[error("render batch texture store is full, cannot add {texture:?}")]
    TextureStoreFull { texture: TextureHandle },

    #[error("no entity for {0:?}")]
    InvalidHandle(EntityHandle),

    #[error("graphics: {0}")]
    Graphics(#[from] GraphicsError),
}
