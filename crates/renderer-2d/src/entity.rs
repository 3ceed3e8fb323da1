use cgmath::{Vector2, Vector4};

use crate::component::{Color, Component, ComponentKind};
use crate::texture::Sprite;
use crate::transform::{replace_if_changed, Transform};

/// A renderable quad: one transform, an ordered list of components, a fixed
/// z-index and a dirty flag.
///
/// Every write that changes position, scale, rotation, color or sprite sets
/// the dirty flag. Writes of an equal value leave it untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    transform: Transform,
    components: Vec<Component>,
    z: i32,
    dirty: bool,
}

impl Entity {
    pub fn new(z: i32) -> Self {
        Self {
            transform: Transform::default(),
            components: Vec::new(),
            z,
            dirty: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn with_position(mut self, position: Vector2<f32>) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_scale(mut self, scale: Vector2<f32>) -> Self {
        self.set_scale(scale);
        self
    }

    pub fn with_color(self, color: Vector4<f32>) -> Self {
        self.with_component(Color::new(color))
    }

    pub fn with_sprite(self, sprite: Sprite) -> Self {
        self.with_component(sprite)
    }

    pub fn with_component(mut self, component: impl Into<Component>) -> Self {
        self.add_component(component);
        self
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        if replace_if_changed(&mut self.transform, transform) {
            self.dirty = true;
        }
    }

    pub fn set_position(&mut self, position: Vector2<f32>) {
        if self.transform.set_position(position) {
            self.dirty = true;
        }
    }

    pub fn set_scale(&mut self, scale: Vector2<f32>) {
        if self.transform.set_scale(scale) {
            self.dirty = true;
        }
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        if self.transform.set_rotation(rotation) {
            self.dirty = true;
        }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Appends a component. Several components of one kind may be attached,
    /// lookups only ever see the first.
    pub fn add_component(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
        self.dirty = true;
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&Component> {
        self.components.iter().find(|c| c.kind() == kind)
    }

    /// Removes the first component of `kind`, if any.
    pub fn remove_component(&mut self, kind: ComponentKind) -> Option<Component> {
        let index = self.components.iter().position(|c| c.kind() == kind)?;
        self.dirty = true;
        Some(self.components.remove(index))
    }

    pub fn color(&self) -> Option<Vector4<f32>> {
        self.components.iter().find_map(|c| match c {
            Component::Color(color) => Some(color.color),
            _ => None,
        })
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.components.iter().find_map(|c| match c {
            Component::Sprite(sprite) => Some(sprite),
            _ => None,
        })
    }

    /// Updates the first color component. Returns `false` if there is none.
    pub fn set_color(&mut self, color: Vector4<f32>) -> bool {
        let Some(current) = self.components.iter_mut().find_map(|c| match c {
            Component::Color(color) => Some(color),
            _ => None,
        }) else {
            return false;
        };
        if replace_if_changed(&mut current.color, color) {
            self.dirty = true;
        }
        true
    }

    /// Updates the first sprite component. Returns `false` if there is none.
    pub fn set_sprite(&mut self, sprite: Sprite) -> bool {
        let Some(current) = self.components.iter_mut().find_map(|c| match c {
            Component::Sprite(sprite) => Some(sprite),
            _ => None,
        }) else {
            return false;
        };
        if replace_if_changed(current, sprite) {
            self.dirty = true;
        }
        true
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(0)
    }
}
