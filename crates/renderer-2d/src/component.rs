use cgmath::Vector4;

use crate::texture::Sprite;

pub const WHITE: Vector4<f32> = Vector4::new(1.0, 1.0, 1.0, 1.0);

/// Capability tag of a [`Component`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Color,
    Sprite,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub color: Vector4<f32>,
}

impl Color {
    pub fn new(color: Vector4<f32>) -> Self {
        Self { color }
    }

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(Vector4::new(r, g, b, a))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self { color: WHITE }
    }
}

/// Behavior attached to an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Component {
    Color(Color),
    Sprite(Sprite),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Color(_) => ComponentKind::Color,
            Component::Sprite(_) => ComponentKind::Sprite,
        }
    }
}

impl From<Color> for Component {
    fn from(color: Color) -> Self {
        Component::Color(color)
    }
}

impl From<Sprite> for Component {
    fn from(sprite: Sprite) -> Self {
        Component::Sprite(sprite)
    }
}
