use foundation::math::Vec3;
use serde::Serialize;

use crate::person::{Person, PersonId, Tier};

/// Reference marker size in unit-sphere units.
pub const REFERENCE_SIZE: f64 = 0.015;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Yellow,
    Red,
}

impl MarkerColor {
    pub const fn rgba(self) -> [f32; 4] {
        match self {
            MarkerColor::Green => [0.133, 0.773, 0.369, 1.0],
            MarkerColor::Yellow => [0.918, 0.702, 0.031, 1.0],
            MarkerColor::Red => [0.937, 0.267, 0.267, 1.0],
        }
    }

    pub const fn hex(self) -> &'static str {
        match self {
            MarkerColor::Green => "#22c55e",
            MarkerColor::Yellow => "#eab308",
            MarkerColor::Red => "#ef4444",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    pub base_size: f64,
}

impl MarkerStyle {
    pub const fn new(color: MarkerColor, base_size: f64) -> Self {
        Self { color, base_size }
    }
}

/// Visual category for a person; first match wins:
/// approved, then 100+ hours, then everyone else.
pub fn classify(person: &Person) -> MarkerStyle {
    match person.tier() {
        Tier::Approved => MarkerStyle::new(MarkerColor::Green, REFERENCE_SIZE),
        Tier::Veteran => MarkerStyle::new(MarkerColor::Yellow, REFERENCE_SIZE * 0.7),
        Tier::Newcomer => MarkerStyle::new(MarkerColor::Red, REFERENCE_SIZE * 0.5),
    }
}

/// Render entity for one person.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub person_id: PersonId,
    pub airport: String,
    pub position: Vec3,
    pub color: MarkerColor,
    pub base_size: f64,
    /// Animated multiplier in `[0, 1]`, applied on all three axes.
    pub scale: f64,
}

impl Marker {
    pub fn new(person: &Person, airport: &str, position: Vec3) -> Self {
        let style = classify(person);
        Self {
            person_id: person.id.clone(),
            airport: airport.to_string(),
            position,
            color: style.color,
            base_size: style.base_size,
            scale: 1.0,
        }
    }

    /// Rendered size after animation.
    pub fn size(&self) -> f64 {
        self.base_size * self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerColor, REFERENCE_SIZE, classify};
    use crate::person::Person;

    #[test]
    fn approved_wins_over_hours() {
        let style = classify(&Person::new("a", "A").approved().with_hours(5.0));
        assert_eq!(style.color, MarkerColor::Green);
        assert_eq!(style.base_size, REFERENCE_SIZE);
    }

    #[test]
    fn hundred_hours_unapproved_is_yellow() {
        let style = classify(&Person::new("b", "B").with_hours(150.0));
        assert_eq!(style.color, MarkerColor::Yellow);
        assert_eq!(style.base_size, REFERENCE_SIZE * 0.7);
    }

    #[test]
    fn everyone_else_is_red() {
        let style = classify(&Person::new("c", "C").with_hours(10.0));
        assert_eq!(style.color, MarkerColor::Red);
        assert_eq!(style.base_size, REFERENCE_SIZE * 0.5);

        assert_eq!(classify(&Person::new("d", "D")).color, MarkerColor::Red);
        assert_eq!(classify(&Person::new("e", "E").with_hours(f64::NAN)).color, MarkerColor::Red);
    }

    #[test]
    fn classification_is_deterministic() {
        let p = Person::new("f", "F").with_hours(100.0);
        assert_eq!(classify(&p), classify(&p));
    }

    #[test]
    fn hex_and_rgba_agree_on_palette_size() {
        for color in [MarkerColor::Green, MarkerColor::Yellow, MarkerColor::Red] {
            assert_eq!(color.hex().len(), 7);
            assert_eq!(color.rgba()[3], 1.0);
        }
    }
}
