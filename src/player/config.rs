use crate::engine::Size;
use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Tuning for one player, read from `player.json` when present.
/// Every field is optional in the file; missing ones keep the default.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    pub width: f64,
    pub height: f64,
    /// horizontal run speed, jumps scale off it too
    pub max_speed: f64,
    /// added to speed_y every airborne tick
    pub gravity: f64,
    /// animation frames per second, independent of the render rate
    pub fps: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            width: 200.0,
            height: 181.83,
            max_speed: 10.0,
            gravity: 1.0,
            fps: 20.0,
        }
    }
}

impl PlayerConfig {
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn frame_interval(&self) -> f64 {
        1000.0 / self.fps
    }

    /// fail fast on values the physics can't work with
    pub fn validate(self) -> Result<Self> {
        ensure_positive_size(self.size(), "player size")?;
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(anyhow!("animation fps must be positive, got {}", self.fps));
        }
        if !(self.gravity.is_finite() && self.gravity >= 0.0) {
            return Err(anyhow!(
                "gravity must be finite and not negative, got {}",
                self.gravity
            ));
        }
        // a negative speed would flip every left/right entry effect
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(anyhow!(
                "max speed must be finite and not negative, got {}",
                self.max_speed
            ));
        }
        Ok(self)
    }
}

/// Both sides finite and above zero. Used for the player and the world.
pub fn ensure_positive_size(size: Size, what: &str) -> Result<Size> {
    let usable = |side: f64| side.is_finite() && side > 0.0;
    if usable(size.width) && usable(size.height) {
        Ok(size)
    } else {
        Err(anyhow!(
            "{} must be finite and positive, got {} x {}",
            what,
            size.width,
            size.height
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_the_sprite_sheet() {
        let config = PlayerConfig::default();
        assert_relative_eq!(config.width, 200.0);
        assert_relative_eq!(config.height, 181.83);
        assert_relative_eq!(config.frame_interval(), 50.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_unusable_values() {
        let zero_fps = PlayerConfig {
            fps: 0.0,
            ..PlayerConfig::default()
        };
        assert!(zero_fps.validate().is_err());

        let flat = PlayerConfig {
            height: 0.0,
            ..PlayerConfig::default()
        };
        assert!(flat.validate().is_err());

        let nan_gravity = PlayerConfig {
            gravity: f64::NAN,
            ..PlayerConfig::default()
        };
        assert!(nan_gravity.validate().is_err());

        let upside_down = PlayerConfig {
            gravity: -1.0,
            ..PlayerConfig::default()
        };
        let err = upside_down.validate().unwrap_err();
        assert!(err.to_string().contains("gravity"));
    }

    #[test]
    fn rejects_negative_or_infinite_values() {
        let backwards = PlayerConfig {
            max_speed: -10.0,
            ..PlayerConfig::default()
        };
        let err = backwards.validate().unwrap_err();
        assert!(err.to_string().contains("max speed"));

        let cases = [
            PlayerConfig {
                width: f64::INFINITY,
                ..PlayerConfig::default()
            },
            PlayerConfig {
                height: f64::INFINITY,
                ..PlayerConfig::default()
            },
            PlayerConfig {
                gravity: f64::INFINITY,
                ..PlayerConfig::default()
            },
            PlayerConfig {
                fps: f64::INFINITY,
                ..PlayerConfig::default()
            },
            PlayerConfig {
                max_speed: f64::NEG_INFINITY,
                ..PlayerConfig::default()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?}");
        }

        // standing still is allowed
        let frozen = PlayerConfig {
            max_speed: 0.0,
            gravity: 0.0,
            ..PlayerConfig::default()
        };
        assert!(frozen.validate().is_ok());
    }

    #[test]
    fn world_size_must_be_finite_and_positive() {
        let ok = Size {
            width: 800.0,
            height: 600.0,
        };
        assert_eq!(ensure_positive_size(ok, "world").unwrap(), ok);

        for (width, height) in [
            (f64::NAN, 600.0),
            (800.0, -1.0),
            (0.0, 600.0),
            (f64::INFINITY, 600.0),
        ] {
            let err = ensure_positive_size(Size { width, height }, "world").unwrap_err();
            assert!(err.to_string().starts_with("world must be"));
        }
    }
}
