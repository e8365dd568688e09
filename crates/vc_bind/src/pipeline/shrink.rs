use crate::access::{Bound, FieldStatus};
use crate::error::BindResult;

/// Compacts every `Valid` field, then the struct's own arena.
pub(crate) fn shrink_allocator<T: Bound>(value: &mut T) -> BindResult<()> {
    let class = value.accessor().class();
    for field in class.fields() {
        if value.accessor().status_at(field.index()) == FieldStatus::Valid {
            field
                .binding
                .shrink_allocator(value)
                .map_err(|err| err.with_field(field.wire_name))?;
        }
    }
    value.accessor_mut().compact()
}
