//! Opaque keys into external template registries.

proto_key!(
    /// Tool quality a tool must offer, e.g. `"Screwing"`.
    ToolQualityId
);

proto_key!(
    /// Action template granted to an entity, e.g. `"ActionPAIOpenMap"`.
    ActionProtoId
);

proto_key!(
    /// Localization id handed to the presentation layer untranslated.
    LocId
);

proto_key!(
    /// Resource path of an audio cue.
    SoundPath
);
