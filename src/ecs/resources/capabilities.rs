use std::collections::{BTreeMap, BTreeSet};

use bevy_ecs::entity::Entity;
use bevy_ecs::resource::Resource;
use serde::Serialize;

use crate::ecs::error::CapabilityError;
use crate::id::HandleSeq;
use crate::model::ActionProtoId;

/// Handle to one granted action. Never reused after revocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ActionHandle(u64);

impl ActionHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Grants and revokes actions bound to an owning entity.
pub trait CapabilityRegistry: Send + Sync {
    fn grant(
        &mut self,
        owner: Entity,
        template: &ActionProtoId,
    ) -> Result<ActionHandle, CapabilityError>;

    fn revoke(&mut self, owner: Entity, handle: ActionHandle) -> Result<(), CapabilityError>;

    /// Handles currently granted to `owner`, in grant order.
    fn granted_to(&self, owner: Entity) -> Vec<ActionHandle>;
}

#[derive(Debug, Clone)]
struct GrantedAction {
    owner: Entity,
    template: ActionProtoId,
}

/// In-world action registry.
///
/// Optionally restricted to a known template set; granting anything else fails
/// with `UnknownTemplate`.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    seq: HandleSeq,
    granted: BTreeMap<ActionHandle, GrantedAction>,
    known: Option<BTreeSet<ActionProtoId>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_templates(templates: impl IntoIterator<Item = ActionProtoId>) -> Self {
        Self {
            known: Some(templates.into_iter().collect()),
            ..Self::default()
        }
    }
}

impl CapabilityRegistry for ActionRegistry {
    fn grant(
        &mut self,
        owner: Entity,
        template: &ActionProtoId,
    ) -> Result<ActionHandle, CapabilityError> {
        if self.known.as_ref().is_some_and(|known| !known.contains(template)) {
            return Err(CapabilityError::UnknownTemplate(template.clone()));
        }
        let handle = ActionHandle(self.seq.next_raw());
        self.granted.insert(
            handle,
            GrantedAction {
                owner,
                template: template.clone(),
            },
        );
        Ok(handle)
    }

    fn revoke(&mut self, owner: Entity, handle: ActionHandle) -> Result<(), CapabilityError> {
        let granted = self
            .granted
            .get(&handle)
            .ok_or(CapabilityError::UnknownHandle(handle))?;
        if granted.owner != owner {
            return Err(CapabilityError::NotOwner {
                handle,
                owner: granted.owner,
                requester: owner,
            });
        }
        if let Some(revoked) = self.granted.remove(&handle) {
            tracing::debug!(?owner, template = %revoked.template, "action revoked");
        }
        Ok(())
    }

    fn granted_to(&self, owner: Entity) -> Vec<ActionHandle> {
        self.granted
            .iter()
            .filter(|(_, g)| g.owner == owner)
            .map(|(h, _)| *h)
            .collect()
    }
}

/// The capability registry the lifecycle controller talks to.
#[derive(Resource)]
pub struct Capabilities(pub Box<dyn CapabilityRegistry>);

impl Capabilities {
    pub fn new(registry: impl CapabilityRegistry + 'static) -> Self {
        Self(Box::new(registry))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new(ActionRegistry::new())
    }
}
