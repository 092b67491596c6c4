use serde::Serialize;
use utoipa::ToSchema;

use super::geodesy::Cartesian3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<u8> { u8::from_str_radix(digits.get(i..i + 2)?, 16).ok() };
        match digits.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// Point marker drawn for every satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MarkerStyle {
    pub pixel_size: u32,
    pub color: Rgba,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            pixel_size: 10,
            color: Rgba::new(0, 255, 255, 255),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Entity {
    pub id: String,
    pub position: Cartesian3,
    pub style: MarkerStyle,
}

/// Boundary to the 3D visualization engine. The engine's scene graph is the
/// only store of entity state.
pub trait SceneEngine {
    fn contains(&self, id: &str) -> bool;

    fn add_entity(&mut self, id: &str, position: Cartesian3, style: MarkerStyle);

    /// Returns false when no entity has that id.
    fn set_position(&mut self, id: &str, position: Cartesian3) -> bool;

    fn remove_entity(&mut self, id: &str) -> bool;

    fn entity_ids(&self) -> Vec<String>;

    fn entities(&self) -> Vec<Entity>;

    fn is_destroyed(&self) -> bool;

    /// Releases the engine. Safe to call more than once.
    fn destroy(&mut self);
}
