//! Topping preset listing

use anyhow::Result;
use sweetbite_toppings::{ToppingShape, ToppingType};

pub fn run() -> Result<()> {
    for kind in ToppingType::ALL {
        let preset = kind.preset();
        println!(
            "{:<10} {:<32} base {}  fresh {}  settled {}",
            kind.name(),
            describe_shape(&preset.shape),
            to_hex(preset.base_color),
            to_hex(preset.fresh_color),
            to_hex(preset.settled_color),
        );
    }
    Ok(())
}

fn describe_shape(shape: &ToppingShape) -> String {
    match shape {
        ToppingShape::Sphere { radius, squash_y } => {
            format!("sphere r={radius} squash={squash_y}")
        }
        ToppingShape::Cone { radius, height } => format!("cone r={radius} h={height}"),
        ToppingShape::Box { extents } => {
            format!("box {}x{}x{}", extents[0], extents[1], extents[2])
        }
        ToppingShape::Cylinder { radius, height } => format!("cylinder r={radius} h={height}"),
    }
}

fn to_hex(rgb: [f32; 3]) -> String {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", byte(rgb[0]), byte(rgb[1]), byte(rgb[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweetbite_toppings::preset::hex_color;

    #[test]
    fn hex_survives_float_conversion() {
        assert_eq!(to_hex(hex_color("#8B5A2B")), "#8B5A2B");
    }

    #[test]
    fn box_shape_lists_extents() {
        let text = describe_shape(&ToppingShape::Box {
            extents: [0.08, 0.04, 0.08],
        });
        assert_eq!(text, "box 0.08x0.04x0.08");
    }
}
