//! Fog-of-war visibility around the player.
//!
//! Distance is Chebyshev (`max(|dx|, |dy|)`), so the fog forms square rings.
//! Tiles within the clear radius are untouched, tiles beyond the max tint
//! radius are fully fogged, and the band in between ramps linearly up to the
//! configured intensity. The ramp tops out at `tint_intensity` and then jumps
//! to `1.0` past the max radius.

use serde::{Deserialize, Serialize};

use crate::palette::Color;

/// Red headroom gained per unit of intensity.
const RED_GAIN: f32 = 0.3;

/// Green/blue share lost per unit of intensity.
const GREEN_BLUE_LOSS: f32 = 0.6;

/// Fog settings.
///
/// Invariant: `max_tint_radius > clear_radius`, `tint_intensity` in `[0, 1]`.
/// Deserialized values go through the setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawVisibility")]
pub struct VisibilityModel {
    enabled: bool,
    clear_radius: u32,
    max_tint_radius: u32,
    tint_intensity: f32,
}

impl Default for VisibilityModel {
    fn default() -> Self {
        Self {
            enabled: true,
            clear_radius: 5,
            max_tint_radius: 8,
            tint_intensity: 0.1,
        }
    }
}

/// Unchecked fog settings as they appear on disk.
#[derive(Deserialize)]
#[serde(default)]
struct RawVisibility {
    enabled: bool,
    clear_radius: u32,
    max_tint_radius: u32,
    tint_intensity: f32,
}

impl Default for RawVisibility {
    fn default() -> Self {
        let model = VisibilityModel::default();
        Self {
            enabled: model.enabled,
            clear_radius: model.clear_radius,
            max_tint_radius: model.max_tint_radius,
            tint_intensity: model.tint_intensity,
        }
    }
}

impl From<RawVisibility> for VisibilityModel {
    fn from(raw: RawVisibility) -> Self {
        let mut model = Self::default();
        model.set_enabled(raw.enabled);
        model.set_clear_radius(raw.clear_radius);
        model.set_max_tint_radius(raw.max_tint_radius);
        model.set_tint_intensity(raw.tint_intensity);
        model
    }
}

impl VisibilityModel {
    /// Creates a model with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the fog.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether fog is applied.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the fully clear radius. The max radius is pushed out if it would
    /// no longer exceed the clear radius.
    pub fn set_clear_radius(&mut self, radius: u32) {
        self.clear_radius = radius;
        if self.max_tint_radius <= radius {
            self.max_tint_radius = radius.saturating_add(1);
        }
    }

    /// Radius within which tiles are not tinted.
    #[must_use]
    pub const fn clear_radius(&self) -> u32 {
        self.clear_radius
    }

    /// Sets the max tint radius, clamped to at least `clear_radius + 1`.
    pub fn set_max_tint_radius(&mut self, radius: u32) {
        self.max_tint_radius = radius.max(self.clear_radius.saturating_add(1));
    }

    /// Radius beyond which tiles are fully fogged.
    #[must_use]
    pub const fn max_tint_radius(&self) -> u32 {
        self.max_tint_radius
    }

    /// Sets the ramp strength, clamped to `[0, 1]`. NaN becomes 0.
    pub fn set_tint_intensity(&mut self, intensity: f32) {
        self.tint_intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 1.0)
        };
    }

    /// Ramp strength.
    #[must_use]
    pub const fn tint_intensity(&self) -> f32 {
        self.tint_intensity
    }

    /// Fog intensity in `[0, 1]` for the tile at `(tx, ty)` seen from the
    /// player at `(px, py)`.
    #[must_use]
    pub fn intensity(&self, px: i64, py: i64, tx: i64, ty: i64) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        let distance = chebyshev(px, py, tx, ty);
        let clear = i64::from(self.clear_radius);
        let max = i64::from(self.max_tint_radius);

        if distance <= clear {
            0.0
        } else if distance > max {
            1.0
        } else {
            let ramp = (distance - clear) as f32 / (max - clear) as f32;
            ramp * self.tint_intensity
        }
    }

    /// Blends `base` toward red by `intensity`.
    #[must_use]
    pub fn tint(base: Color, intensity: f32) -> Color {
        if intensity <= 0.0 || intensity.is_nan() {
            return base;
        }
        let (r, g, b) = base.channels();
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));

        let red = (r + (255.0 - r) * intensity * RED_GAIN).clamp(0.0, 255.0);
        let green = (g - g * intensity * GREEN_BLUE_LOSS).clamp(0.0, 255.0);
        let blue = (b - b * intensity * GREEN_BLUE_LOSS).clamp(0.0, 255.0);

        Color::from_channels(red.floor() as u8, green.floor() as u8, blue.floor() as u8)
    }

    /// Whether fog is enabled and the tile is within the max tint radius.
    #[must_use]
    pub fn within_radius(&self, px: i64, py: i64, tx: i64, ty: i64) -> bool {
        self.enabled && chebyshev(px, py, tx, ty) <= i64::from(self.max_tint_radius)
    }
}

fn chebyshev(px: i64, py: i64, tx: i64, ty: i64) -> i64 {
    (tx - px).abs().max((ty - py).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deserialize_clamps_out_of_range_settings() {
        let model: VisibilityModel = toml::from_str(
            "enabled = true\nclear_radius = 10\nmax_tint_radius = 3\ntint_intensity = 7.5",
        )
        .expect("valid toml");
        assert_eq!(model.clear_radius(), 10);
        assert_eq!(model.max_tint_radius(), 11);
        assert!((model.tint_intensity() - 1.0).abs() < f32::EPSILON);

        let model: VisibilityModel =
            toml::from_str("clear_radius = 2\nmax_tint_radius = 12\ntint_intensity = 7.5")
                .expect("valid toml");
        assert!(model.max_tint_radius() > model.clear_radius());
        let fog = model.intensity(0, 0, 7, 0);
        assert!((0.0..=1.0).contains(&fog));
        assert!(model.is_enabled());
    }

    #[test]
    fn test_serialize_then_deserialize_keeps_settings() {
        let mut model = VisibilityModel::new();
        model.set_clear_radius(3);
        model.set_max_tint_radius(9);
        model.set_tint_intensity(0.4);
        let text = toml::to_string(&model).expect("serialize");
        let back: VisibilityModel = toml::from_str(&text).expect("deserialize");
        assert_eq!(back, model);
    }

    fn scenario_model() -> VisibilityModel {
        let mut model = VisibilityModel::new();
        model.set_clear_radius(5);
        model.set_max_tint_radius(8);
        model.set_tint_intensity(0.8);
        model
    }

    #[test]
    fn test_ramp_and_full_fog() {
        let model = scenario_model();
        assert_eq!(model.intensity(25, 25, 25, 25), 0.0);
        assert_eq!(model.intensity(25, 25, 30, 20), 0.0);

        let d6 = model.intensity(25, 25, 31, 25);
        assert!((d6 - 0.8 / 3.0).abs() < 1e-5);
        assert!((d6 - 0.267).abs() < 1e-3);

        assert_eq!(model.intensity(25, 25, 25, 34), 1.0);
    }

    #[test]
    fn test_jump_at_max_radius() {
        let model = scenario_model();
        let at_max = model.intensity(0, 0, 8, 0);
        let past_max = model.intensity(0, 0, 9, 0);
        assert!((at_max - 0.8).abs() < 1e-6);
        assert_eq!(past_max, 1.0);
    }

    #[test]
    fn test_disabled_model_is_clear() {
        let mut model = scenario_model();
        model.set_enabled(false);
        assert_eq!(model.intensity(0, 0, 100, 100), 0.0);
        assert!(!model.within_radius(0, 0, 0, 0));
    }

    #[test]
    fn test_setters_keep_invariants() {
        let mut model = VisibilityModel::new();
        model.set_max_tint_radius(2);
        assert_eq!(model.max_tint_radius(), 6);

        model.set_clear_radius(10);
        assert_eq!(model.max_tint_radius(), 11);

        model.set_tint_intensity(4.0);
        assert_eq!(model.tint_intensity(), 1.0);
        model.set_tint_intensity(-1.0);
        assert_eq!(model.tint_intensity(), 0.0);
        model.set_tint_intensity(f32::NAN);
        assert_eq!(model.tint_intensity(), 0.0);
    }

    #[test]
    fn test_tint_known_values() {
        let base = Color::from_rgb(0x90EE90);
        assert_eq!(VisibilityModel::tint(base, 0.0), base);

        // r = 144 + 111 * 0.3 = 177.3, g = 238 - 238 * 0.6 = 95.2, b = 144 - 86.4 = 57.6
        let fogged = VisibilityModel::tint(base, 1.0);
        assert_eq!(fogged.channels(), (177, 95, 57));
    }

    #[test]
    fn test_within_radius() {
        let model = scenario_model();
        assert!(model.within_radius(0, 0, 8, -8));
        assert!(!model.within_radius(0, 0, 9, 0));
    }

    proptest! {
        #[test]
        fn prop_intensity_monotonic(
            px in -100i64..100,
            py in -100i64..100,
            dx in -1i64..=1,
            dy in -1i64..=1,
            clear in 0u32..10,
            extra in 1u32..10,
            strength in 0.0f32..=1.0,
        ) {
            prop_assume!(dx != 0 || dy != 0);
            let mut model = VisibilityModel::new();
            model.set_clear_radius(clear);
            model.set_max_tint_radius(clear + extra);
            model.set_tint_intensity(strength);

            let mut previous = 0.0f32;
            for step in 0..30 {
                let value = model.intensity(px, py, px + dx * step, py + dy * step);
                prop_assert!((0.0..=1.0).contains(&value));
                prop_assert!(value >= previous);
                if step <= i64::from(clear) {
                    prop_assert_eq!(value, 0.0);
                }
                if step > i64::from(clear + extra) {
                    prop_assert_eq!(value, 1.0);
                }
                previous = value;
            }
        }

        #[test]
        fn prop_tint_stays_in_range(rgb in 0u32..=0xFF_FFFF, intensity in 0.0f32..=1.0) {
            let tinted = VisibilityModel::tint(Color::from_rgb(rgb), intensity);
            prop_assert!(tinted.rgb() <= 0xFF_FFFF);
            let (r, _, _) = tinted.channels();
            let (base_r, _, _) = Color::from_rgb(rgb).channels();
            prop_assert!(r >= base_r);
        }
    }
}
