//! Topping presets: which mesh and colors each topping kind draws with.
//! Purely cosmetic; the simulation treats every kind the same.

use serde::{Deserialize, Serialize};

/// Kind of topping being sprinkled or placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToppingType {
    #[default]
    Nuts,
    Flowers,
    Berries,
    Chocolate,
    Sprinkles,
    /// Fallback for names we don't recognize
    Generic,
}

/// Base mesh a renderer instances for a topping
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToppingShape {
    /// `squash_y` scales the sphere vertically
    Sphere { radius: f32, squash_y: f32 },
    Cone { radius: f32, height: f32 },
    Box { extents: [f32; 3] },
    Cylinder { radius: f32, height: f32 },
}

/// Geometry and colors for one topping kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToppingPreset {
    pub shape: ToppingShape,
    /// Material color of the mesh
    pub base_color: [f32; 3],
    /// Instance tint while falling
    pub fresh_color: [f32; 3],
    /// Instance tint once stuck or placed
    pub settled_color: [f32; 3],
}

const FRESH: &str = "#6B3E26";
const SETTLED: &str = "#8B5A2B";

impl ToppingType {
    pub const ALL: [ToppingType; 6] = [
        ToppingType::Nuts,
        ToppingType::Flowers,
        ToppingType::Berries,
        ToppingType::Chocolate,
        ToppingType::Sprinkles,
        ToppingType::Generic,
    ];

    /// Parse a lowercase topping name; unknown names fall back to `Generic`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "nuts" => ToppingType::Nuts,
            "flowers" => ToppingType::Flowers,
            "berries" => ToppingType::Berries,
            "chocolate" => ToppingType::Chocolate,
            "sprinkles" => ToppingType::Sprinkles,
            _ => ToppingType::Generic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToppingType::Nuts => "nuts",
            ToppingType::Flowers => "flowers",
            ToppingType::Berries => "berries",
            ToppingType::Chocolate => "chocolate",
            ToppingType::Sprinkles => "sprinkles",
            ToppingType::Generic => "generic",
        }
    }

    pub fn preset(self) -> ToppingPreset {
        let (shape, base) = match self {
            ToppingType::Nuts => (
                ToppingShape::Sphere {
                    radius: 0.12,
                    squash_y: 0.8,
                },
                "#6B3E26",
            ),
            ToppingType::Flowers => (
                ToppingShape::Cone {
                    radius: 0.08,
                    height: 0.15,
                },
                "#FF69B4",
            ),
            ToppingType::Berries => (
                ToppingShape::Sphere {
                    radius: 0.06,
                    squash_y: 1.0,
                },
                "#DC143C",
            ),
            ToppingType::Chocolate => (
                ToppingShape::Box {
                    extents: [0.08, 0.04, 0.08],
                },
                "#8B4513",
            ),
            ToppingType::Sprinkles => (
                ToppingShape::Cylinder {
                    radius: 0.02,
                    height: 0.08,
                },
                "#FFD700",
            ),
            ToppingType::Generic => (
                ToppingShape::Sphere {
                    radius: 0.1,
                    squash_y: 1.0,
                },
                "#8B4513",
            ),
        };

        ToppingPreset {
            shape,
            base_color: hex_color(base),
            fresh_color: hex_color(FRESH),
            settled_color: hex_color(SETTLED),
        }
    }
}

/// Parse `#RRGGBB` into [0, 1] floats. Malformed input yields mid grey.
pub fn hex_color(hex: &str) -> [f32; 3] {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return [0.5, 0.5, 0.5];
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.5)
    };
    [channel(0), channel(2), channel(4)]
}
