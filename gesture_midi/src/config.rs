//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object `{}` is a complete
//! configuration.  Values are fixed for the lifetime of an engine.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use hand_pose::{ClassifierConfig, GestureLabel, EXTENSION_THRESHOLD, PINCH_THRESHOLD, RATIO_MARGIN};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::smoother::DEFAULT_ALPHA;

pub const FILTER_CC:   u8 = 74;
pub const REVERB_CC:   u8 = 91;
pub const AUX_MIX_CC:  u8 = 22;
pub const REVERB_GAIN: f32 = 90.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("bad engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(String),
}

// ════════════════════════════════════════════════════════════════════════════
// EngineMode
// ════════════════════════════════════════════════════════════════════════════

/// Which mapping an engine performs.  The two are never combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Finger notes plus smoothed controllers.
    #[default]
    Performance,
    /// One short note per classified gesture.
    Pulse,
}

impl EngineMode {
    pub fn name(self) -> &'static str {
        match self {
            EngineMode::Performance => "performance",
            EngineMode::Pulse       => "pulse",
        }
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "performance" | "perf" => Ok(EngineMode::Performance),
            "pulse"                => Ok(EngineMode::Pulse),
            other => Err(ConfigError::Invalid(format!(
                "unknown mode {:?} (expected performance or pulse)", other
            ))),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Note tables
// ════════════════════════════════════════════════════════════════════════════

/// Right-hand finger notes.  Defaults spell C E G A.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerNoteTable {
    pub index:  u8,
    pub middle: u8,
    pub ring:   u8,
    pub pinky:  u8,
}

impl FingerNoteTable {
    /// In `FingerId::LONG` order.
    pub fn as_array(&self) -> [u8; 4] {
        [self.index, self.middle, self.ring, self.pinky]
    }
}

impl Default for FingerNoteTable {
    fn default() -> Self {
        FingerNoteTable { index: 60, middle: 64, ring: 67, pinky: 69 }
    }
}

/// Pulse-mode note per gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureNoteTable {
    pub pinch:      u8,
    pub point:      u8,
    pub peace:      u8,
    pub open_hand:  u8,
    pub fist:       u8,
    pub pinky_out:  u8,
    pub thumbs_up:  u8,
    pub combo_sign: u8,
}

impl GestureNoteTable {
    /// `None` for [`GestureLabel::Unknown`], which never sounds.
    pub fn note_for(&self, label: GestureLabel) -> Option<u8> {
        match label {
            GestureLabel::Pinch     => Some(self.pinch),
            GestureLabel::Point     => Some(self.point),
            GestureLabel::Peace     => Some(self.peace),
            GestureLabel::OpenHand  => Some(self.open_hand),
            GestureLabel::Fist      => Some(self.fist),
            GestureLabel::PinkyOut  => Some(self.pinky_out),
            GestureLabel::ThumbsUp  => Some(self.thumbs_up),
            GestureLabel::ComboSign => Some(self.combo_sign),
            GestureLabel::Unknown   => None,
        }
    }

    fn notes(&self) -> [u8; 8] {
        [
            self.pinch, self.point, self.peace, self.open_hand,
            self.fist, self.pinky_out, self.thumbs_up, self.combo_sign,
        ]
    }
}

impl Default for GestureNoteTable {
    fn default() -> Self {
        GestureNoteTable {
            pinch:      60,
            point:      62,
            peace:      64,
            open_hand:  65,
            fist:       67,
            pinky_out:  69,
            thumbs_up:  71,
            combo_sign: 72,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EngineConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// MIDI channel, 0–15.
    pub channel:              u8,
    pub extension_threshold:  f32,
    pub pinch_threshold:      f32,
    pub ratio_margin:         f32,
    pub alpha:                f32,
    pub filter_cc:            u8,
    pub reverb_cc:            u8,
    pub aux_mix_cc:           u8,
    /// Wrist distance → reverb scale factor.
    pub reverb_gain:          f32,
    pub finger_notes:         FingerNoteTable,
    pub gesture_notes:        GestureNoteTable,
    pub pulse_velocity:       u8,
    pub pulse_hold_ms:        u64,
    /// Turn finger notes off when the right hand leaves the frame.
    pub release_on_hand_loss: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            channel:              0,
            extension_threshold:  EXTENSION_THRESHOLD,
            pinch_threshold:      PINCH_THRESHOLD,
            ratio_margin:         RATIO_MARGIN,
            alpha:                DEFAULT_ALPHA,
            filter_cc:            FILTER_CC,
            reverb_cc:            REVERB_CC,
            aux_mix_cc:           AUX_MIX_CC,
            reverb_gain:          REVERB_GAIN,
            finger_notes:         FingerNoteTable::default(),
            gesture_notes:        GestureNoteTable::default(),
            pulse_velocity:       100,
            pulse_hold_ms:        200,
            release_on_hand_loss: false,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ConfigError::Invalid("engine config must be a JSON object".into()));
        }
        let cfg: EngineConfig = serde_json::from_value(value)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            pinch_threshold:     self.pinch_threshold,
            extension_threshold: self.extension_threshold,
        }
    }

    pub fn pulse_hold(&self) -> Duration {
        Duration::from_millis(self.pulse_hold_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let bad = |msg: String| Err(ConfigError::Invalid(msg));

        if self.channel > 15 {
            return bad(format!("channel {} is out of range 0-15", self.channel));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return bad(format!("alpha {} must be in (0, 1]", self.alpha));
        }
        for (name, v) in [
            ("extension_threshold", self.extension_threshold),
            ("pinch_threshold",     self.pinch_threshold),
            ("ratio_margin",        self.ratio_margin),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return bad(format!("{} must be positive, got {}", name, v));
            }
        }
        if !(self.reverb_gain.is_finite() && self.reverb_gain >= 0.0) {
            return bad(format!("reverb_gain must be non-negative, got {}", self.reverb_gain));
        }

        let sevens = [self.filter_cc, self.reverb_cc, self.aux_mix_cc, self.pulse_velocity]
            .into_iter()
            .chain(self.finger_notes.as_array())
            .chain(self.gesture_notes.notes());
        for v in sevens {
            if v > 127 {
                return bad(format!("MIDI data byte {} is out of range 0-127", v));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.channel, 0);
        assert_eq!((cfg.filter_cc, cfg.reverb_cc, cfg.aux_mix_cc), (74, 91, 22));
        assert_eq!(cfg.finger_notes.as_array(), [60, 64, 67, 69]);
        assert_eq!(cfg.pulse_hold(), Duration::from_millis(200));
        assert!((cfg.alpha - 0.3).abs() < 1e-6);
        assert!(!cfg.release_on_hand_loss);
        cfg.validate().unwrap();
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let cfg = EngineConfig::from_json(
            r#"{"channel": 3, "finger_notes": {"ring": 66}, "release_on_hand_loss": true}"#,
        ).unwrap();
        assert_eq!(cfg.channel, 3);
        assert_eq!(cfg.finger_notes.as_array(), [60, 64, 66, 69]);
        assert!(cfg.release_on_hand_loss);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(EngineConfig::from_json(r#"{"channel": 16}"#), Err(ConfigError::Invalid(_))));
        assert!(matches!(EngineConfig::from_json(r#"{"alpha": 0}"#),    Err(ConfigError::Invalid(_))));
        assert!(matches!(
            EngineConfig::from_json(r#"{"gesture_notes": {"fist": 200}}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(EngineConfig::from_json("{channel"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn positional_array_is_not_a_config() {
        assert!(matches!(EngineConfig::from_json("[1, 2]"), Err(ConfigError::Invalid(_))));
        assert!(matches!(EngineConfig::from_json("3"),      Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn gesture_table_skips_unknown() {
        let t = GestureNoteTable::default();
        assert_eq!(t.note_for(GestureLabel::Point), Some(62));
        assert_eq!(t.note_for(GestureLabel::ComboSign), Some(72));
        assert_eq!(t.note_for(GestureLabel::Unknown), None);
    }

    #[test]
    fn mode_parses_by_name() {
        assert_eq!("Pulse".parse::<EngineMode>().unwrap(), EngineMode::Pulse);
        assert_eq!("performance".parse::<EngineMode>().unwrap(), EngineMode::Performance);
        assert!("loud".parse::<EngineMode>().is_err());
        assert_eq!(serde_json::to_string(&EngineMode::Pulse).unwrap(), "\"pulse\"");
    }
}
