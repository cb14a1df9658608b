use std::path::Path;
use std::time::Duration;

use palette::Srgb;
use rand_distr::Uniform;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Everything about the page that can be tuned without touching code.
///
/// Missing fields in a JSON config fall back to the values in [`Settings::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub particle_count: usize,

    /// Particles closer together than this get a line drawn between them.
    pub link_distance: f64,
    pub link_width: f64,
    #[serde(with = "hex")]
    pub link_color: Srgb<u8>,

    /// The colour painted over the previous frame, at `trail_alpha` opacity, to leave trails.
    #[serde(with = "hex")]
    pub background: Srgb<u8>,
    pub trail_alpha: f32,

    /// Velocity components are picked from `-max_speed..=max_speed`, in units per frame.
    pub max_speed: f64,
    pub max_radius: f64,
    #[serde(with = "hex_pair")]
    pub palette: [Srgb<u8>; 2],

    pub answer_delay_ms: u64,
    pub total_questions: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            particle_count: 100,

            link_distance: 80.0,
            link_width: 0.5,
            link_color: Srgb::new(0, 243, 255),

            background: Srgb::new(5, 5, 16),
            trail_alpha: 0.4,

            max_speed: 0.25,
            max_radius: 2.0,
            palette: [Srgb::new(0, 243, 255), Srgb::new(255, 42, 109)],

            answer_delay_ms: 1000,
            total_questions: 5,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Settings> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Settings> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        fn invalid(name: &'static str, reason: &str) -> Result<()> {
            Err(Error::InvalidSetting {
                name,
                reason: reason.to_owned(),
            })
        }

        if !(self.link_distance > 0.0 && self.link_distance.is_finite()) {
            return invalid("link_distance", "must be a positive number");
        }
        if !(0.0..=1.0).contains(&self.trail_alpha) {
            return invalid("trail_alpha", "must be between 0 and 1");
        }
        if !(self.max_speed >= 0.0 && self.max_speed.is_finite()) {
            return invalid("max_speed", "must be zero or a positive number");
        }
        if self.max_speed > MAX_SPAN {
            return invalid("max_speed", "is too large to sample velocities from");
        }
        if !(self.max_radius > 0.0 && self.max_radius.is_finite()) {
            return invalid("max_radius", "must be a positive number");
        }
        if self.max_radius > MAX_SPAN {
            return invalid("max_radius", "is too large to sample radii from");
        }
        if !(self.link_width >= 0.0 && self.link_width.is_finite()) {
            return invalid("link_width", "must be zero or a positive number");
        }

        Ok(())
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    // Ideally these would live on the struct, but `Uniform` doesn't implement `Serialize`.
    // Both are inclusive so that a speed of zero still builds a valid distribution.
    pub fn velocity_distr(&self) -> Uniform<f64> {
        let speed = span(self.max_speed);
        Uniform::new_inclusive(-speed, speed)
    }

    pub fn radius_distr(&self) -> Uniform<f64> {
        Uniform::new_inclusive(0.0, span(self.max_radius))
    }
}

/// `Uniform` panics if the width of its range overflows, so a bound on either side of zero has to
/// stay well clear of `f64::MAX`.
const MAX_SPAN: f64 = f64::MAX / 4.0;

/// Turns a configured bound into something `Uniform` can always be built from.
fn span(bound: f64) -> f64 {
    if bound.is_finite() {
        bound.abs().min(MAX_SPAN)
    } else {
        0.0
    }
}

/// (De)serializes a colour as a `#rrggbb` string.
mod hex {
    use palette::Srgb;
    use serde::de::Error;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn to_string(color: &Srgb<u8>) -> String {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    }

    pub fn parse<E: Error>(s: &str) -> Result<Srgb<u8>, E> {
        s.parse::<Srgb<u8>>()
            .map_err(|e| E::custom(format!("invalid colour {:?}: {}", s, e)))
    }

    pub fn serialize<S: Serializer>(color: &Srgb<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_string(color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Srgb<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s)
    }
}

mod hex_pair {
    use palette::Srgb;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        colors: &[Srgb<u8>; 2],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        [super::hex::to_string(&colors[0]), super::hex::to_string(&colors[1])].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[Srgb<u8>; 2], D::Error> {
        let [a, b] = <[String; 2]>::deserialize(deserializer)?;
        Ok([super::hex::parse(&a)?, super::hex::parse(&b)?])
    }
}
