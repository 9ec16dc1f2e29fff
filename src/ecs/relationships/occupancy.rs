use std::ops::Deref;

use bevy_ecs::component::Component;
use bevy_ecs::entity::Entity;

// ---------------------------------------------------------------------------
// InhabitedBy: device -> player bound to its ghost role
// ---------------------------------------------------------------------------

#[derive(Component, Clone, Debug)]
#[relationship(relationship_target = Inhabits)]
pub struct InhabitedBy(pub Entity);

#[derive(Component, Default, Debug)]
#[relationship_target(relationship = InhabitedBy)]
pub struct Inhabits(Vec<Entity>);

impl Deref for Inhabits {
    type Target = [Entity];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
