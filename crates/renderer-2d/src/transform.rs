use cgmath::Vector2;

/// Placement of a quad: anchored at `position`, extended by `scale` along +x
/// and +y.
///
/// Setters report whether the stored value changed, writing an equal value is
/// a no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vector2<f32>,
    scale: Vector2<f32>,
    // radians, not applied to quad geometry yet
    rotation: f32,
}

impl Transform {
    pub fn new(position: Vector2<f32>, scale: Vector2<f32>) -> Self {
        Self {
            position,
            scale,
            rotation: 0.0,
        }
    }

    pub fn from_position(position: Vector2<f32>) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn position(&self) -> Vector2<f32> {
        self.position
    }

    pub fn scale(&self) -> Vector2<f32> {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vector2<f32>) -> bool {
        replace_if_changed(&mut self.position, position)
    }

    pub fn set_scale(&mut self, scale: Vector2<f32>) -> bool {
        replace_if_changed(&mut self.scale, scale)
    }

    pub fn set_rotation(&mut self, rotation: f32) -> bool {
        replace_if_changed(&mut self.rotation, rotation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2::new(0.0, 0.0),
            scale: Vector2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

pub(crate) fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
