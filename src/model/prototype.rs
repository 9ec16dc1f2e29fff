use serde::{Deserialize, Serialize};

use super::keys::{ActionProtoId, LocId, SoundPath, ToolQualityId};

pub const DEFAULT_EXTRACTION_METHOD: &str = "Screwing";
pub const DEFAULT_INSERTION_SOUND: &str = "/Audio/Items/pistol_magin.ogg";
pub const DEFAULT_EXTRACTION_SOUND: &str = "/Audio/Items/pistol_magout.ogg";
pub const DEFAULT_MIDI_ACTION: &str = "ActionPAIPlayMidi";
pub const DEFAULT_MAP_ACTION: &str = "ActionPAIOpenMap";
pub const DEFAULT_BRICK_CHANCE: f32 = 0.5;
pub const DEFAULT_BRICK_POPUP: &str = "pai-system-brick-popup";
pub const DEFAULT_SCRAMBLE_POPUP: &str = "pai-system-scramble-popup";

/// Template a device's initial state is built from.
///
/// Every field has a default, so a template document only needs to list what
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaiPrototype {
    pub chip_extraction_method: ToolQualityId,
    pub chip_insertion_sound: SoundPath,
    pub chip_extraction_sound: SoundPath,
    pub chip_slots: u32,
    /// `None` disables the audio-play capability for this template.
    pub midi_action_id: Option<ActionProtoId>,
    pub map_action_id: ActionProtoId,
    pub brick_chance: f32,
    pub brick_popup: LocId,
    pub scramble_popup: LocId,
}

impl Default for PaiPrototype {
    fn default() -> Self {
        Self {
            chip_extraction_method: ToolQualityId::new(DEFAULT_EXTRACTION_METHOD),
            chip_insertion_sound: SoundPath::new(DEFAULT_INSERTION_SOUND),
            chip_extraction_sound: SoundPath::new(DEFAULT_EXTRACTION_SOUND),
            chip_slots: 1,
            midi_action_id: Some(ActionProtoId::new(DEFAULT_MIDI_ACTION)),
            map_action_id: ActionProtoId::new(DEFAULT_MAP_ACTION),
            brick_chance: DEFAULT_BRICK_CHANCE,
            brick_popup: LocId::new(DEFAULT_BRICK_POPUP),
            scramble_popup: LocId::new(DEFAULT_SCRAMBLE_POPUP),
        }
    }
}

impl PaiPrototype {
    /// Parse a template document. Missing fields take their defaults and the
    /// brick chance is normalized.
    pub fn from_json(src: &str) -> Result<Self, serde_json::Error> {
        let mut proto: Self = serde_json::from_str(src)?;
        proto.brick_chance = proto.normalized_brick_chance();
        Ok(proto)
    }

    /// Brick chance clamped into `[0, 1]`. NaN and infinities become 0, so a
    /// broken template never bricks.
    pub fn normalized_brick_chance(&self) -> f32 {
        if self.brick_chance.is_finite() {
            self.brick_chance.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let proto = PaiPrototype::from_json("{}").unwrap();
        assert_eq!(proto, PaiPrototype::default());
        assert_eq!(proto.chip_extraction_method.as_str(), "Screwing");
        assert_eq!(proto.chip_slots, 1);
    }

    #[test]
    fn overrides_apply_and_brick_chance_is_clamped() {
        let proto = PaiPrototype::from_json(
            r#"{ "brickChance": 3.0, "midiActionId": null, "chipExtractionMethod": "Prying" }"#,
        )
        .unwrap();
        assert_eq!(proto.brick_chance, 1.0);
        assert!(proto.midi_action_id.is_none());
        assert_eq!(proto.chip_extraction_method.as_str(), "Prying");
        assert_eq!(proto.map_action_id.as_str(), DEFAULT_MAP_ACTION);
    }

    #[test]
    fn non_finite_brick_chance_normalizes_to_zero() {
        for chance in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let proto = PaiPrototype {
                brick_chance: chance,
                ..PaiPrototype::default()
            };
            assert_eq!(proto.normalized_brick_chance(), 0.0);
        }
        let proto = PaiPrototype {
            brick_chance: -0.25,
            ..PaiPrototype::default()
        };
        assert_eq!(proto.normalized_brick_chance(), 0.0);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(PaiPrototype::from_json("{ \"chipSlots\": \"one\" }").is_err());
    }
}
