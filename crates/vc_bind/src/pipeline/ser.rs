use crate::access::{Bound, FieldStatus};
use crate::error::{BindError, BindResult};
use crate::pipeline::SerializeFlags;
use crate::value::Sink;

/// Writes `value` into `sink`, returning the number of members written.
pub(crate) fn serialize<T: Bound>(
    value: &T,
    sink: &mut dyn Sink,
    flags: SerializeFlags,
) -> BindResult<usize> {
    let accessor = value.accessor();
    if accessor.is_detached() {
        return Err(BindError::inner("cannot serialize a detached accessor"));
    }
    let class = accessor.class();

    if class.is_scalar() {
        let field = &class.fields[0];
        match accessor.status_at(0) {
            FieldStatus::Valid => field.binding.serialize(value, sink, flags)?,
            _ => sink.null()?,
        }
        return Ok(1);
    }

    sink.begin_object()?;
    let mut count = 0;
    for field in class.iter() {
        let wire_name = field.wire_name;
        match accessor.status_at(field.index()) {
            FieldStatus::Valid => {
                sink.key(wire_name)?;
                field
                    .binding
                    .serialize(value, sink, flags)
                    .map_err(|err| err.with_field(wire_name))?;
            }
            FieldStatus::Null if !flags.contains(SerializeFlags::IGNORE_NULL) => {
                sink.key(wire_name)?;
                sink.null()?;
            }
            FieldStatus::Missing if flags.contains(SerializeFlags::EMIT_MISSING) => {
                sink.key(wire_name)?;
                sink.null()?;
            }
            FieldStatus::NotAField => {
                return Err(BindError::inner("status table out of sync with its class"));
            }
            _ => continue,
        }
        count += 1;
    }

    if !flags.contains(SerializeFlags::IGNORE_UNKNOWN) {
        count += accessor.write_unknown(sink)?;
    }
    sink.end_object()?;

    Ok(count)
}
