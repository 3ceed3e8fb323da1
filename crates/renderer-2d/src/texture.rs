use cgmath::Vector2;
use log::warn;

/// Opaque handle to a texture owned by the graphics context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// A loaded texture and its size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Texture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn new(handle: TextureHandle, width: u32, height: u32) -> Self {
        Self {
            handle,
            width,
            height,
        }
    }
}

/// UVs covering a whole texture, in quad corner order.
pub const FULL_TEX_COORDS: [Vector2<f32>; 4] = [
    Vector2::new(1.0, 1.0),
    Vector2::new(1.0, 0.0),
    Vector2::new(0.0, 0.0),
    Vector2::new(0.0, 1.0),
];

/// A region of a texture. `tex_coords` holds one UV per quad corner, in the
/// same order as the quad corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    pub texture: Texture,
    pub tex_coords: [Vector2<f32>; 4],
}

impl Sprite {
    pub fn new(texture: Texture) -> Self {
        Self {
            texture,
            tex_coords: FULL_TEX_COORDS,
        }
    }

    pub fn with_tex_coords(texture: Texture, tex_coords: [Vector2<f32>; 4]) -> Self {
        Self {
            texture,
            tex_coords,
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.texture.handle
    }
}

/// Sprites cut out of a texture laid out as a grid of equally sized cells.
///
/// Cells are read left to right starting with the top row. Texture
/// coordinates have their origin at the bottom-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Spritesheet {
    sprites: Vec<Sprite>,
}

impl Spritesheet {
    pub fn new(texture: Texture, width: u32, height: u32, count: usize, spacing: u32) -> Self {
        let tex_w = texture.width as f32;
        let tex_h = texture.height as f32;

        let mut sprites = Vec::with_capacity(count);
        let mut x = 0i64;
        let mut y = i64::from(texture.height) - i64::from(height);
        for _ in 0..count {
            if y < 0 || width == 0 || height == 0 {
                warn!(
                    "spritesheet: {:?} only fits {} sprites of {}x{}",
                    texture.handle,
                    sprites.len(),
                    width,
                    height
                );
                break;
            }
            let left = x as f32 / tex_w;
            let right = (x + i64::from(width)) as f32 / tex_w;
            let bottom = y as f32 / tex_h;
            let top = (y + i64::from(height)) as f32 / tex_h;
            sprites.push(Sprite::with_tex_coords(
                texture,
                [
                    Vector2::new(right, top),
                    Vector2::new(right, bottom),
                    Vector2::new(left, bottom),
                    Vector2::new(left, top),
                ],
            ));

            x += i64::from(width) + i64::from(spacing);
            if x >= i64::from(texture.width) {
                x = 0;
                y -= i64::from(height) + i64::from(spacing);
            }
        }

        Self { sprites }
    }

    pub fn sprite(&self, index: usize) -> Option<&Sprite> {
        self.sprites.get(index)
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture() -> Texture {
        Texture::new(TextureHandle(7), 64, 32)
    }

    #[test]
    fn sprite_defaults_to_full_texture() {
        let sprite = Sprite::new(texture());
        assert_eq!(sprite.tex_coords, FULL_TEX_COORDS);
        assert_eq!(sprite.handle(), TextureHandle(7));
    }

    #[test]
    fn spritesheet_reads_top_row_first() {
        let sheet = Spritesheet::new(texture(), 32, 16, 4, 0);
        assert_eq!(sheet.len(), 4);

        let first = sheet.sprite(0).unwrap();
        assert_eq!(
            first.tex_coords,
            [
                Vector2::new(0.5, 1.0),
                Vector2::new(0.5, 0.5),
                Vector2::new(0.0, 0.5),
                Vector2::new(0.0, 1.0),
            ]
        );

        let third = sheet.sprite(2).unwrap();
        assert_eq!(third.tex_coords[2], Vector2::new(0.0, 0.0));
        assert_eq!(third.tex_coords[0], Vector2::new(0.5, 0.5));
    }

    #[test]
    fn spritesheet_stops_when_texture_is_exhausted() {
        let sheet = Spritesheet::new(texture(), 32, 16, 10, 0);
        assert_eq!(sheet.len(), 4);
        assert!(sheet.sprite(4).is_none());
    }

    #[test]
    fn spritesheet_handles_huge_cells_and_spacing() {
        let sheet = Spritesheet::new(texture(), u32::MAX, 16, 3, u32::MAX);
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.sprite(0).unwrap().tex_coords[2], Vector2::new(0.0, 0.5));

        let tall = Spritesheet::new(texture(), 32, u32::MAX, 2, 0);
        assert!(tall.is_empty());
    }
}
