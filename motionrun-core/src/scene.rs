use crate::game::{GameObject, ObjectId};

/// 0xRRGGBB
pub type Rgb = u32;

pub const COIN_COLOR: Rgb = 0xffff00;
pub const RUNNER_OBSTACLE_COLOR: Rgb = 0x416346;
pub const DODGE_OBSTACLE_COLOR: Rgb = 0xff0000;
pub const PLAYER_COLOR: Rgb = 0x0000ff;
pub const DODGE_PLAYER_COLOR: Rgb = 0x00ff00;
pub const GROUND_COLOR: Rgb = 0x8b4513;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
    Plane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneCamera {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
}

impl SceneCamera {
    pub fn new(position: [f32; 3], target: [f32; 3]) -> Self {
        Self {
            position,
            target,
            fov_degrees: 75.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneItem {
    pub id: Option<ObjectId>,
    pub shape: Shape,
    pub position: [f32; 3],
    pub size: [f32; 3], // full extents; spheres use size[0] as diameter
    pub rotation: [f32; 3],
    pub color: Rgb,
}

impl SceneItem {
    pub fn new(shape: Shape, position: [f32; 3], size: [f32; 3], color: Rgb) -> Self {
        Self {
            id: None,
            shape,
            position,
            size,
            rotation: [0.0; 3],
            color,
        }
    }

    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn for_object(object: &GameObject, shape: Shape, diameter: f32, color: Rgb) -> Self {
        Self {
            id: Some(object.id),
            ..Self::new(shape, object.position, [diameter; 3], color)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Hud {
    pub score: Option<u32>,
    pub banner: Option<String>,
    pub message: Option<String>,
}

/// Everything the renderer needs for one redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneFrame {
    pub camera: SceneCamera,
    pub items: Vec<SceneItem>,
    pub hud: Hud,
}

impl SceneFrame {
    pub fn new(camera: SceneCamera) -> Self {
        Self {
            camera,
            items: Vec::new(),
            hud: Hud::default(),
        }
    }

    pub fn item(&self, id: ObjectId) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.id == Some(id))
    }
}

pub fn rgb_components(color: Rgb) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}
