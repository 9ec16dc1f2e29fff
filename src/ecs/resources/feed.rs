use bevy_ecs::message::MessageReader;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::ecs::events::PaiReaction;

/// Reactions collected for the presentation layer, kept until drained.
#[derive(Resource, Debug, Clone, Default)]
pub struct ReactionFeed(Vec<PaiReaction>);

impl ReactionFeed {
    pub fn drain(&mut self) -> Vec<PaiReaction> {
        std::mem::take(&mut self.0)
    }
}

/// Copies this tick's `PaiReaction` messages into the feed.
pub fn collect_reactions(mut reactions: MessageReader<PaiReaction>, mut feed: ResMut<ReactionFeed>) {
    feed.0.extend(reactions.read().cloned());
}
