use bitflags::bitflags;

bitflags! {
    /// Options of a serialization pass.
    ///
    /// The empty set writes every `Valid` and `Null` field, skips `Missing`
    /// ones, and appends unknown members.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SerializeFlags: u8 {
        /// Skip fields whose status is `Null` instead of writing `null`.
        const IGNORE_NULL     = 1 << 0;
        /// Do not append unknown members.
        const IGNORE_UNKNOWN  = 1 << 1;
        /// Write `Missing` fields as `null` instead of skipping them.
        const EMIT_MISSING    = 1 << 2;
    }
}

bitflags! {
    /// Options of a deserialization pass.
    ///
    /// The empty set copies retained values, keeps unknown members and
    /// enforces presence of every non-optional field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeserializeFlags: u8 {
        /// Steal retained subtrees from a mutable source instead of copying.
        const MOVE_FROM_SOURCE    = 1 << 0;
        /// Fail on the first member without a registered field.
        /// Takes precedence over `IGNORE_UNKNOWN`.
        const ERROR_ON_UNKNOWN    = 1 << 1;
        /// Drop members without a registered field.
        const IGNORE_UNKNOWN      = 1 << 2;
        /// Do not check that required fields were present.
        const SKIP_PRESENCE_CHECK = 1 << 3;
    }
}
