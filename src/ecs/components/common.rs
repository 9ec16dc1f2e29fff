use bevy_ecs::component::Component;

use crate::model::ToolQualityId;

/// Display name of an entity. Devices are renamed after whoever activated them.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Named(pub String);

/// Marks an entity that fits a device's chip slot.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AiChip;

/// Qualities a tool offers when used on a device.
#[derive(Component, Debug, Clone, Default)]
pub struct ToolQualities(pub Vec<ToolQualityId>);

impl ToolQualities {
    pub fn offers(&self, quality: &ToolQualityId) -> bool {
        self.0.contains(quality)
    }
}
