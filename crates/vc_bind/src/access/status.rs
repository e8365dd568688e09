use core::fmt;

/// Presence state of one field of a bound struct.
///
/// Transitions only happen through accessor operations:
///
/// ```text
///            deserialize / mark_valid / set
///  Missing  ------------------------------>  Valid
///     |                                        |
///     |  null into a NULLABLE field / mark_null |
///     +------------------>  Null  <-------------+
///
///  any state  --- mark_missing / failed codec --->  Missing
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldStatus {
    /// Absent. The initial state.
    #[default]
    Missing,
    /// Present as an explicit `null`; only for `NULLABLE` fields.
    Null,
    /// Present with a value.
    Valid,
    /// Returned for a lookup that does not resolve to a field. Never stored.
    NotAField,
}

impl FieldStatus {
    /// Returns `true` for `Valid` and `Null`.
    #[inline]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Valid | Self::Null)
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "missing",
            Self::Null => "null",
            Self::Valid => "valid",
            Self::NotAField => "not a field",
        })
    }
}
