use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::AccessError;
use crate::info::{ParamInfo, ParamMode};
use crate::registry::{MemberDescriptor, signature};
use crate::value::{TypeClass, TypeRef, Value};

use super::MemberTable;

pub(crate) const EXACT: u32 = 4;
pub(crate) const ASSIGNABLE: u32 = 3;
pub(crate) const NULL: u32 = 2;
pub(crate) const WIDENING: u32 = 1;
pub(crate) const OUT: u32 = 0;

fn widens(ty: TypeRef, arg: &Value) -> bool {
    match (ty.class(), arg.num_kind()) {
        (TypeClass::Number(to), Some(from)) => from.widens_to(to),
        _ => false,
    }
}

/// How well `arg` fits `param`, `None` if it does not fit at all.
pub(crate) fn score(param: &ParamInfo, arg: &Value) -> Option<u32> {
    if param.mode() == ParamMode::Out {
        return Some(OUT);
    }
    let ty = param.ty();
    if arg.is_null() {
        return ty.is_nullable().then_some(NULL);
    }
    let arg_key = arg.type_key();
    if arg_key == Some(ty.key()) {
        return Some(EXACT);
    }
    match ty.class() {
        TypeClass::Any => Some(ASSIGNABLE),
        TypeClass::AnyObject => arg.as_object().map(|_| ASSIGNABLE),
        TypeClass::Nullable => {
            let inner = ty.underlying()?;
            if arg_key == Some(inner.key()) {
                Some(ASSIGNABLE)
            } else {
                widens(inner, arg).then_some(WIDENING)
            }
        }
        _ => widens(ty, arg).then_some(WIDENING),
    }
}

/// The total score of calling `candidate` with `args`, `None` if some argument does not fit.
fn score_call(candidate: &MemberDescriptor, args: &[Value]) -> Option<u32> {
    let params = candidate.params();
    if params.len() != args.len() {
        return None;
    }
    params
        .iter()
        .zip(args)
        .try_fold(0, |total, (param, arg)| Some(total + score(param, arg)?))
}

/// Picks the overload of `name` scoring highest for `args`.
pub(crate) fn resolve_overload<'a>(
    table: &'a MemberTable,
    name: &str,
    args: &[Value],
) -> Result<&'a MemberDescriptor, AccessError> {
    let mut best: Vec<&MemberDescriptor> = Vec::new();
    let mut best_score = 0;

    for candidate in table.methods(name) {
        let Some(total) = score_call(candidate, args) else {
            continue;
        };
        if best.is_empty() || total > best_score {
            best.clear();
            best.push(candidate);
            best_score = total;
        } else if total == best_score {
            best.push(candidate);
        }
    }

    match best.as_slice() {
        [] => {
            let arg_types: Vec<_> = args.iter().map(Value::type_name).collect();
            Err(table.not_found(&signature(name, &arg_types[..])))
        }
        [single] => Ok(*single),
        tied => Err(AccessError::AmbiguousOverload {
            type_name: table.type_name(),
            member: String::from(name),
            candidates: tied.iter().map(ToString::to_string).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use core::any::TypeId;

    use super::{ASSIGNABLE, EXACT, NULL, OUT, WIDENING, resolve_overload, score};
    use crate::dynamic::MemberTable;
    use crate::fixtures::{Echo, registry};
    use crate::info::{ParamInfo, ParamMode};
    use crate::{AccessError, Boxable, Object, TypeRef, Value};

    fn param<T: Boxable>(mode: ParamMode) -> ParamInfo {
        ParamInfo::new("p", TypeRef::of::<T>(), mode)
    }

    #[test]
    fn argument_scores() {
        let by_value = ParamMode::Value;
        assert_eq!(score(&param::<i32>(by_value), &Value::I32(1)), Some(EXACT));
        assert_eq!(score(&param::<i64>(by_value), &Value::I32(1)), Some(WIDENING));
        assert_eq!(score(&param::<i16>(by_value), &Value::I32(1)), None);
        assert_eq!(score(&param::<String>(by_value), &Value::I32(1)), None);

        assert_eq!(score(&param::<Value>(by_value), &Value::I32(1)), Some(ASSIGNABLE));
        assert_eq!(score(&param::<Value>(by_value), &Value::Null), Some(NULL));
        assert_eq!(score(&param::<String>(by_value), &Value::Null), None);

        let nullable = param::<Option<i64>>(by_value);
        assert_eq!(score(&nullable, &Value::Null), Some(NULL));
        assert_eq!(score(&nullable, &Value::I64(1)), Some(ASSIGNABLE));
        assert_eq!(score(&nullable, &Value::U8(1)), Some(WIDENING));
        assert_eq!(score(&nullable, &Value::from("1")), None);

        let object = Value::from(Object::new(Arc::new(7_u64)));
        assert_eq!(score(&param::<Object>(by_value), &object), Some(ASSIGNABLE));
        assert_eq!(score(&param::<Object>(by_value), &Value::U64(7)), None);

        // An object holding a `u64` is not a `u64`, nor the reverse.
        let boxed_number = Value::Object(Object::new(Arc::new(7_u64)));
        assert_eq!(score(&param::<u64>(by_value), &boxed_number), None);
        assert_eq!(score(&param::<Arc<u64>>(by_value), &boxed_number), Some(EXACT));
        assert_eq!(score(&param::<Arc<u64>>(by_value), &Value::U64(7)), None);
        assert_eq!(score(&param::<Option<u64>>(by_value), &boxed_number), None);

        assert_eq!(score(&param::<i32>(ParamMode::Out), &Value::from("x")), Some(OUT));
        assert_eq!(score(&param::<i32>(ParamMode::Ref), &Value::I32(1)), Some(EXACT));
    }

    #[test]
    fn best_total_wins() {
        let registry = registry();
        let table = MemberTable::build(&registry, TypeId::of::<Echo>());

        let args = [Value::from("Test"), Value::from("Testing"), Value::Null];
        let chosen = resolve_overload(&table, "EchoInternal3", &args).unwrap();
        assert_eq!(chosen.params()[1].ty(), TypeRef::of::<String>());

        let chosen = resolve_overload(&table, "EchoInternal2", &[Value::I32(1)]).unwrap();
        assert_eq!(chosen.params()[0].ty(), TypeRef::of::<i32>());

        // `u8` widens to `i32` but not to `String`.
        let chosen = resolve_overload(&table, "EchoInternal2", &[Value::U8(1)]).unwrap();
        assert_eq!(chosen.params()[0].ty(), TypeRef::of::<i32>());
    }

    #[test]
    fn ties_are_ambiguous() {
        let registry = registry();
        let table = MemberTable::build(&registry, TypeId::of::<Echo>());

        let err = resolve_overload(&table, "Maybe", &[Value::Null]).unwrap_err();
        let AccessError::AmbiguousOverload { member, candidates, .. } = err else {
            panic!("expected an ambiguity, got {err:?}");
        };
        assert_eq!(member, "Maybe");
        assert_eq!(candidates.len(), 2);

        let chosen = resolve_overload(&table, "Maybe", &[Value::I32(3)]).unwrap();
        assert_eq!(chosen.params()[0].ty(), TypeRef::of::<Option<i32>>());
    }

    #[test]
    fn nothing_fits() {
        let registry = registry();
        let table = MemberTable::build(&registry, TypeId::of::<Echo>());

        let err = resolve_overload(&table, "EchoInternal2", &[Value::Bool(true)]).unwrap_err();
        assert!(matches!(
            err,
            AccessError::MemberNotFound { ref member, .. } if member == "EchoInternal2(bool)"
        ));
        let err = resolve_overload(&table, "EchoInternal2", &vec![Value::I32(1); 2]);
        assert!(matches!(err, Err(AccessError::MemberNotFound { .. })));
        let err = resolve_overload(&table, "Unknown", &[]);
        assert!(matches!(err, Err(AccessError::MemberNotFound { .. })));
    }
}
