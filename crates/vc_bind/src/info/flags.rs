use bitflags::bitflags;

bitflags! {
    /// Presence rules of a registered field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// The field may be absent after deserialization.
        const OPTIONAL = 1 << 0;
        /// The field accepts an explicit `null`.
        const NULLABLE = 1 << 1;
    }
}

impl FieldFlags {
    #[inline]
    pub const fn is_optional(self) -> bool {
        self.contains(Self::OPTIONAL)
    }

    #[inline]
    pub const fn is_nullable(self) -> bool {
        self.contains(Self::NULLABLE)
    }
}
