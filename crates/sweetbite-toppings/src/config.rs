//! Emitter configuration (parsed from TOML)

use crate::preset::ToppingType;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use sweetbite_core::{Result, ToppingError};

/// Upper bound on pool size accepted from config
pub const MAX_CAPACITY: usize = 100_000;

/// How pointer input turns into toppings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpawnMode {
    /// Bursts of falling toppings that stick where they land
    #[default]
    Sprinkle,
    /// One topping per click, put directly on the surface under the cursor
    Place,
}

impl SpawnMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SpawnMode::Sprinkle => "sprinkle",
            SpawnMode::Place => "place",
        }
    }
}

impl FromStr for SpawnMode {
    type Err = ToppingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sprinkle" => Ok(SpawnMode::Sprinkle),
            "place" => Ok(SpawnMode::Place),
            _ => Err(ToppingError::UnknownMode(s.to_string())),
        }
    }
}

/// Which candidate wins when several surfaces accept a falling topping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Closest hit along the downward ray
    #[default]
    Nearest,
    /// First accepted hit in surface registration order
    FirstRegistered,
}

/// Simulation constants for one topping emitter.
///
/// Ranges are `[min, max]`; horizontal (x/z) ranges apply to both axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmitterConfig {
    pub capacity: usize,
    pub topping: ToppingType,
    pub mode: SpawnMode,
    /// Downward acceleration applied to falling toppings
    pub gravity_scale: f32,
    pub spawn_velocity_xz: [f32; 2],
    pub spawn_velocity_y: [f32; 2],
    pub spawn_jitter_xz: [f32; 2],
    /// Offset above the unprojected origin so toppings visibly fall in
    pub spawn_jitter_y: [f32; 2],
    /// NDC depth used when unprojecting a sprinkle origin
    pub spawn_depth: f32,
    pub sprinkle_scale: [f32; 2],
    pub place_scale: [f32; 2],
    /// Falling toppings below this height are freed
    pub deactivation_height: f32,
    pub surface_height: f32,
    pub surface_center_xz: [f32; 2],
    pub surface_radius: f32,
    /// Max |hit.y - surface_height| for a falling topping to stick
    pub stick_tolerance: f32,
    /// Max distance between a falling topping and its hit for it to stick
    pub capture_radius: f32,
    /// Max |hit.y - surface_height| for a place-mode click to land
    pub place_tolerance: f32,
    /// Lift along the surface normal applied on stick/place
    pub surface_normal_offset: f32,
    pub spin_pitch: f32,
    pub spin_yaw: f32,
    pub down_burst: u32,
    pub drag_burst: u32,
    pub tie_break: TieBreak,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            topping: ToppingType::Nuts,
            mode: SpawnMode::Sprinkle,
            gravity_scale: 9.8 * 0.6,
            spawn_velocity_xz: [-0.2, 0.2],
            spawn_velocity_y: [-1.8, -0.8],
            spawn_jitter_xz: [-0.3, 0.3],
            spawn_jitter_y: [1.2, 2.2],
            spawn_depth: 0.5,
            sprinkle_scale: [0.8, 1.2],
            place_scale: [0.9, 1.1],
            deactivation_height: -3.0,
            surface_height: 1.2,
            surface_center_xz: [0.0, 0.0],
            surface_radius: 2.0,
            stick_tolerance: 0.25,
            capture_radius: 3.0,
            place_tolerance: 0.5,
            surface_normal_offset: 0.02,
            spin_pitch: 0.2,
            spin_yaw: 0.6,
            down_burst: 12,
            drag_burst: 4,
            tie_break: TieBreak::Nearest,
        }
    }
}

impl EmitterConfig {
    /// Center of the target surface in world space
    pub fn surface_center(&self) -> Vec3 {
        Vec3::new(
            self.surface_center_xz[0],
            self.surface_height,
            self.surface_center_xz[1],
        )
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::value::Table = toml::from_str(text)?;
        Self::from_toml(&table)
    }

    /// Parse from a TOML table. Missing keys keep their defaults.
    pub fn from_toml(table: &toml::value::Table) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = table.get("capacity") {
            let n = v
                .as_integer()
                .ok_or_else(|| type_error("capacity", "an integer", v))?;
            config.capacity = n.clamp(1, MAX_CAPACITY as i64) as usize;
        }
        if let Some(v) = table.get("topping") {
            config.topping = ToppingType::from_name(toml_str("topping", v)?);
        }
        if let Some(v) = table.get("mode") {
            config.mode = toml_str("mode", v)?.parse()?;
        }
        if let Some(v) = table.get("tie_break") {
            config.tie_break = match toml_str("tie_break", v)? {
                "nearest" => TieBreak::Nearest,
                "first_registered" => TieBreak::FirstRegistered,
                other => {
                    return Err(ToppingError::InvalidConfig(format!(
                        "tie_break must be \"nearest\" or \"first_registered\", got \"{other}\""
                    )));
                }
            };
        }

        let floats: [(&str, &mut f32); 11] = [
            ("gravity_scale", &mut config.gravity_scale),
            ("spawn_depth", &mut config.spawn_depth),
            ("deactivation_height", &mut config.deactivation_height),
            ("surface_height", &mut config.surface_height),
            ("surface_radius", &mut config.surface_radius),
            ("stick_tolerance", &mut config.stick_tolerance),
            ("capture_radius", &mut config.capture_radius),
            ("place_tolerance", &mut config.place_tolerance),
            ("surface_normal_offset", &mut config.surface_normal_offset),
            ("spin_pitch", &mut config.spin_pitch),
            ("spin_yaw", &mut config.spin_yaw),
        ];
        for (key, slot) in floats {
            if let Some(v) = table.get(key) {
                *slot = toml_f32(key, v)?;
            }
        }

        let pairs: [(&str, &mut [f32; 2]); 7] = [
            ("spawn_velocity_xz", &mut config.spawn_velocity_xz),
            ("spawn_velocity_y", &mut config.spawn_velocity_y),
            ("spawn_jitter_xz", &mut config.spawn_jitter_xz),
            ("spawn_jitter_y", &mut config.spawn_jitter_y),
            ("sprinkle_scale", &mut config.sprinkle_scale),
            ("place_scale", &mut config.place_scale),
            ("surface_center_xz", &mut config.surface_center_xz),
        ];
        for (key, slot) in pairs {
            if let Some(v) = table.get(key) {
                *slot = toml_vec2(key, v)?;
            }
        }

        if let Some(v) = table.get("down_burst") {
            config.down_burst = toml_u32("down_burst", v)?;
        }
        if let Some(v) = table.get("drag_burst") {
            config.drag_burst = toml_u32("drag_burst", v)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reject inverted ranges and values the simulation can't use
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("spawn_velocity_xz", self.spawn_velocity_xz),
            ("spawn_velocity_y", self.spawn_velocity_y),
            ("spawn_jitter_xz", self.spawn_jitter_xz),
            ("spawn_jitter_y", self.spawn_jitter_y),
            ("sprinkle_scale", self.sprinkle_scale),
            ("place_scale", self.place_scale),
        ];
        for (field, [min, max]) in ranges {
            if !min.is_finite() || !max.is_finite() {
                return Err(ToppingError::InvalidConfig(format!(
                    "{field} must be finite"
                )));
            }
            if min > max {
                return Err(ToppingError::InvertedRange {
                    field: field.to_string(),
                    min,
                    max,
                });
            }
        }

        for (field, [min, _]) in [
            ("sprinkle_scale", self.sprinkle_scale),
            ("place_scale", self.place_scale),
        ] {
            if min <= 0.0 {
                return Err(ToppingError::InvalidConfig(format!(
                    "{field} must be positive, got minimum {min}"
                )));
            }
        }

        let non_negative = [
            ("gravity_scale", self.gravity_scale),
            ("surface_radius", self.surface_radius),
            ("stick_tolerance", self.stick_tolerance),
            ("capture_radius", self.capture_radius),
            ("place_tolerance", self.place_tolerance),
            ("surface_normal_offset", self.surface_normal_offset),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ToppingError::ValueOutOfRange {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("spawn_depth", self.spawn_depth),
            ("deactivation_height", self.deactivation_height),
            ("surface_height", self.surface_height),
            ("spin_pitch", self.spin_pitch),
            ("spin_yaw", self.spin_yaw),
        ] {
            if !value.is_finite() {
                return Err(ToppingError::InvalidConfig(format!(
                    "{field} must be finite"
                )));
            }
        }

        Ok(())
    }
}

// ── TOML helpers (handle integer/float coercion) ──

fn type_error(key: &str, expected: &str, v: &toml::Value) -> ToppingError {
    ToppingError::InvalidConfig(format!(
        "{key} must be {expected}, got {} `{v}`",
        v.type_str()
    ))
}

fn toml_str<'a>(key: &str, v: &'a toml::Value) -> Result<&'a str> {
    v.as_str().ok_or_else(|| type_error(key, "a string", v))
}

fn toml_f32(key: &str, v: &toml::Value) -> Result<f32> {
    v.as_float()
        .map(|f| f as f32)
        .or_else(|| v.as_integer().map(|i| i as f32))
        .ok_or_else(|| type_error(key, "a number", v))
}

fn toml_vec2(key: &str, v: &toml::Value) -> Result<[f32; 2]> {
    match v.as_array().map(Vec::as_slice) {
        Some([a, b]) => Ok([toml_f32(key, a)?, toml_f32(key, b)?]),
        _ => Err(type_error(key, "a two-number array", v)),
    }
}

fn toml_u32(key: &str, v: &toml::Value) -> Result<u32> {
    let n = v
        .as_integer()
        .ok_or_else(|| type_error(key, "an integer", v))?;
    u32::try_from(n).map_err(|_| ToppingError::ValueOutOfRange {
        field: key.to_string(),
        value: n as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.gravity_scale - 5.88).abs() < 1e-4);
        assert_eq!(config.surface_center(), Vec3::new(0.0, 1.2, 0.0));
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
capacity = 800
topping = "berries"
mode = "place"
gravity_scale = 9.8
sprinkle_scale = [0.5, 0.75]
tie_break = "first_registered"
"#;
        let config = EmitterConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.capacity, 800);
        assert_eq!(config.topping, ToppingType::Berries);
        assert_eq!(config.mode, SpawnMode::Place);
        assert!((config.gravity_scale - 9.8).abs() < 1e-6);
        assert_eq!(config.sprinkle_scale, [0.5, 0.75]);
        assert_eq!(config.tie_break, TieBreak::FirstRegistered);
        // Untouched keys keep defaults
        assert!((config.stick_tolerance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn toml_integer_float_coercion() {
        // `[-2, 0]` gives integers; `deactivation_height = -5` too
        let toml_str = "spawn_velocity_y = [-2, 0]\ndeactivation_height = -5";
        let config = EmitterConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.spawn_velocity_y, [-2.0, 0.0]);
        assert!((config.deactivation_height + 5.0).abs() < 1e-6);
    }

    #[test]
    fn capacity_is_clamped() {
        let config = EmitterConfig::from_toml_str("capacity = 0").unwrap();
        assert_eq!(config.capacity, 1);
        let config = EmitterConfig::from_toml_str("capacity = 5000000").unwrap();
        assert_eq!(config.capacity, MAX_CAPACITY);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = EmitterConfig::from_toml_str("sprinkle_scale = [1.2, 0.8]").unwrap_err();
        assert!(matches!(err, ToppingError::InvertedRange { .. }));
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = EmitterConfig::from_toml_str("stick_tolerance = -0.1").unwrap_err();
        assert!(matches!(err, ToppingError::ValueOutOfRange { .. }));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = EmitterConfig::from_toml_str("mode = \"drizzle\"").unwrap_err();
        assert!(matches!(err, ToppingError::UnknownMode(_)));
    }

    #[test]
    fn unknown_topping_is_generic() {
        let config = EmitterConfig::from_toml_str("topping = \"fondant\"").unwrap();
        assert_eq!(config.topping, ToppingType::Generic);
    }

    #[test]
    fn default_survives_toml_dump() {
        let config = EmitterConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("mode = \"sprinkle\""));
        let reparsed = EmitterConfig::from_toml_str(&text).unwrap();
        assert_eq!(reparsed, config);
    }

    #[test]
    fn burst_sizes_must_fit_u32() {
        let config = EmitterConfig::from_toml_str("down_burst = 30\ndrag_burst = 0").unwrap();
        assert_eq!(config.down_burst, 30);
        assert_eq!(config.drag_burst, 0);

        let err = EmitterConfig::from_toml_str("down_burst = 5000000000").unwrap_err();
        assert!(matches!(err, ToppingError::ValueOutOfRange { ref field, .. } if field == "down_burst"));
        let err = EmitterConfig::from_toml_str("drag_burst = -1").unwrap_err();
        assert!(matches!(err, ToppingError::ValueOutOfRange { .. }));
        let err = EmitterConfig::from_toml_str("down_burst = 12.5").unwrap_err();
        assert!(matches!(err, ToppingError::InvalidConfig(_)));
    }

    #[test]
    fn wrong_value_types_are_rejected() {
        for text in [
            "gravity_scale = \"fast\"",
            "capacity = 800.0",
            "sprinkle_scale = [0.5]",
            "spawn_jitter_y = [1.0, \"high\"]",
            "mode = 3",
            "tie_break = true",
            "topping = 1",
        ] {
            let err = EmitterConfig::from_toml_str(text).unwrap_err();
            assert!(matches!(err, ToppingError::InvalidConfig(_)), "{text}");
        }
    }

    #[test]
    fn spawn_mode_from_str() {
        assert_eq!("Place".parse::<SpawnMode>().unwrap(), SpawnMode::Place);
        assert!("rain".parse::<SpawnMode>().is_err());
    }
}
