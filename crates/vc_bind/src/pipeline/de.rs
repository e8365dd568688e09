use alloc::vec::Vec;

use crate::access::{Bound, FieldStatus};
use crate::error::{BindError, BindResult};
use crate::info::{ClassInfo, FieldInfo};
use crate::pipeline::{DeContext, DeserializeFlags};
use crate::value::{ExpectedKind, Source};

/// Reads `value` from `source`.
///
/// The accessor is reset first: an owned arena is cleared and reused, a
/// detached one receives a fresh arena, and every status becomes `Missing`.
pub(crate) fn deserialize<T: Bound>(
    value: &mut T,
    source: Source<'_>,
    ctx: &mut DeContext,
) -> BindResult<()> {
    value.accessor_mut().prepare();
    let class = value.accessor().class();

    let result = if class.is_scalar() {
        read_field(value, &class.fields[0], source, ctx, false)
    } else {
        read_members(value, class, source, ctx)
    }
    .and_then(|()| check_presence(value, class, ctx.flags()));

    if result.is_err() {
        value.accessor_mut().set_valid(false);
    }
    result
}

fn read_members<T: Bound>(
    value: &mut T,
    class: &'static ClassInfo<T>,
    source: Source<'_>,
    ctx: &mut DeContext,
) -> BindResult<()> {
    let members = match source.into_members() {
        Ok(members) => members,
        Err(source) => return Err(BindError::mismatch(ExpectedKind::Object, source.value())),
    };

    let flags = ctx.flags();
    for (key, member) in members {
        if let Some(field) = class.field_by_wire_name(key) {
            log::trace!("`{}`: member `{key}` -> field {}", class.name, field.index);
            read_field(value, field, member, ctx, true)?;
        } else if flags.contains(DeserializeFlags::ERROR_ON_UNKNOWN) {
            return Err(BindError::unknown_member(key));
        } else if flags.contains(DeserializeFlags::IGNORE_UNKNOWN) {
            log::trace!("`{}`: dropped unknown member `{key}`", class.name);
        } else {
            log::trace!("`{}`: kept unknown member `{key}`", class.name);
            value.accessor_mut().push_unknown(key, member.into_value())?;
        }
    }
    Ok(())
}

/// Decodes one field, rolling it back to its default on failure.
fn read_field<T: Bound>(
    value: &mut T,
    field: &FieldInfo<T>,
    source: Source<'_>,
    ctx: &mut DeContext,
    named: bool,
) -> BindResult<()> {
    let index = field.index();

    if source.is_null() && field.is_nullable() {
        field.binding.reset(value);
        value.accessor_mut().set_status_at(index, FieldStatus::Null);
        return Ok(());
    }

    match ctx.nested(|ctx| field.binding.deserialize(source, value, ctx)) {
        Ok(()) => {
            value.accessor_mut().set_status_at(index, FieldStatus::Valid);
            Ok(())
        }
        Err(err) => {
            field.binding.reset(value);
            value.accessor_mut().set_status_at(index, FieldStatus::Missing);
            Err(if named { err.with_field(field.wire_name) } else { err })
        }
    }
}

/// Fails with every required field that is still `Missing`.
fn check_presence<T: Bound>(
    value: &T,
    class: &ClassInfo<T>,
    flags: DeserializeFlags,
) -> BindResult<()> {
    if flags.contains(DeserializeFlags::SKIP_PRESENCE_CHECK) {
        return Ok(());
    }

    let accessor = value.accessor();
    let missing: Vec<&'static str> = class
        .iter()
        .filter(|field| !field.is_optional())
        .filter(|field| accessor.status_at(field.index()) == FieldStatus::Missing)
        .map(|field| field.wire_name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BindError::presence(missing))
    }
}
