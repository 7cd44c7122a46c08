use alloc::string::ToString;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::info::RawMethod;
use crate::registry::{MemberDescriptor, Resolved, TypeRegistry};
use crate::value::Value;
use crate::{AccessError, TargetFound};

use super::Frame;
use super::target::TargetBinding;

struct InvokerInner {
    descriptor: MemberDescriptor,
    target: TargetBinding,
    body: Arc<dyn RawMethod>,
}

/// A compiled method call.
#[derive(Clone)]
pub struct Invoker(Arc<InvokerInner>);

impl Invoker {
    #[inline]
    pub fn descriptor(&self) -> &MemberDescriptor {
        &self.0.descriptor
    }

    /// Whether both handles share one compiled accessor.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Calls the method on `target` with positional `args`.
    ///
    /// `args` must hold exactly one value per declared parameter. By-value
    /// arguments are converted to their declared types and never modified.
    /// After the call, by-reference and output slots hold the callee's final
    /// values; an output the callee never assigned reads back as `Null`.
    ///
    /// Returns `None` for a void method. If the call fails, `args` is left untouched.
    pub fn invoke(
        &self,
        target: Option<&mut dyn Any>,
        args: &mut [Value],
    ) -> Result<Option<Value>, AccessError> {
        let inner = &*self.0;
        let params = inner.descriptor.params();
        if args.len() != params.len() {
            return Err(AccessError::ArityMismatch {
                member: inner.descriptor.to_string(),
                expected: params.len(),
                actual: args.len(),
            });
        }
        let target = inner.target.bind_mut(target)?;
        let mut frame = Frame::prepare(params, args)?;

        let returned = inner
            .body
            .call(target, &mut frame)
            .ok_or_else(|| AccessError::InvalidTarget {
                member: inner.descriptor.to_string(),
                expected: inner.descriptor.declaring_name(),
                found: TargetFound::Unrelated,
            })??;

        frame.write_back(args);
        Ok(returned)
    }
}

impl fmt::Debug for Invoker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoker({})", self.0.descriptor)
    }
}

/// Compiles a call of the method `descriptor`, whatever its visibility.
///
/// The descriptor must be closed: a generic method definition fails with
/// [`AccessError::OpenGenericMethod`] until it is bound with
/// [`TypeRegistry::close_generic`].
///
/// # Examples
///
/// ```
/// use core::any::TypeId;
/// use lb_access::compile::compile_method;
/// use lb_access::info::{Method, TypeInfo, Visibility};
/// use lb_access::registry::TypeRegistry;
/// use lb_access::{TypeRef, Value};
///
/// struct Swapper;
///
/// let mut registry = TypeRegistry::empty();
/// registry.insert(
///     TypeInfo::builder::<Swapper>()
///         .method(
///             Method::<Swapper>::new("Swap", Visibility::Internal)
///                 .ref_param::<String>("text")
///                 .returns_void(|_, frame| frame.set(0, String::from("1234"))),
///         )
///         .build(),
/// );
///
/// let swap = registry
///     .method(TypeId::of::<Swapper>(), "Swap", &[TypeRef::of::<String>()])
///     .unwrap();
/// let invoker = compile_method(&registry, &swap).unwrap();
///
/// let mut args = [Value::from("test")];
/// assert_eq!(invoker.invoke(Some(&mut Swapper), &mut args), Ok(None));
/// assert_eq!(args[0], Value::from("1234"));
/// ```
pub fn compile_method(
    registry: &TypeRegistry,
    descriptor: &MemberDescriptor,
) -> Result<Invoker, AccessError> {
    if descriptor.is_open_generic() {
        return Err(AccessError::OpenGenericMethod {
            member: descriptor.to_string(),
            arity: descriptor.key().generic_arity(),
        });
    }
    let Some(Resolved::Method(method)) = registry.resolve(descriptor.key()) else {
        return Err(descriptor.not_found());
    };
    log::debug!("compiled invoker for `{descriptor}`");
    Ok(Invoker(Arc::new(InvokerInner {
        descriptor: descriptor.clone(),
        target: TargetBinding::new(registry, descriptor),
        body: Arc::clone(method.body()),
    })))
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::sync::Arc;
    use core::any::TypeId;

    use super::compile_method;
    use crate::fixtures::{Echo, Employee, registry};
    use crate::registry::TypeRegistry;
    use crate::value::{Object, TypeRef, Value};
    use crate::{AccessError, TargetFound};

    fn invoker(registry: &TypeRegistry, name: &str, params: &[TypeRef]) -> super::Invoker {
        let descriptor = registry.method(TypeId::of::<Echo>(), name, params).unwrap();
        compile_method(registry, &descriptor).unwrap()
    }

    #[test]
    fn out_parameter_receives_assigned_value() {
        let registry = registry();
        let params = [TypeRef::of::<String>(), TypeRef::of::<i32>()];
        let try_parse = invoker(&registry, "TryParse", &params);
        let mut echo = Echo::default();

        for placeholder in [Value::Null, Value::I32(-1), Value::from("ignored")] {
            let mut args = [Value::from("21"), placeholder];
            let ok = try_parse.invoke(Some(&mut echo), &mut args).unwrap();
            assert_eq!(ok, Some(Value::Bool(true)));
            assert_eq!(args, [Value::from("21"), Value::I32(21)]);
        }
    }

    #[test]
    fn unassigned_out_reads_back_null() {
        let registry = registry();
        let skip = invoker(&registry, "Skip", &[TypeRef::of::<String>()]);
        let mut args = [Value::from("placeholder")];
        assert_eq!(skip.invoke(Some(&mut Echo::default()), &mut args), Ok(None));
        assert_eq!(args, [Value::Null]);
    }

    #[test]
    fn ref_parameter_is_written_back() {
        let registry = registry();
        let swap = invoker(&registry, "Swap", &[TypeRef::of::<String>()]);
        let mut args = [Value::from("test")];
        assert_eq!(swap.invoke(Some(&mut Echo::default()), &mut args), Ok(None));
        assert_eq!(args[0], Value::from("1234"));
    }

    #[test]
    fn by_value_arguments_are_not_overwritten() {
        let registry = registry();
        let widen = invoker(&registry, "Widen", &[TypeRef::of::<i64>()]);
        let mut args = [Value::I8(5)];
        let result = widen.invoke(Some(&mut Echo::default()), &mut args).unwrap();
        assert_eq!(result, Some(Value::I64(10)));
        assert_eq!(args, [Value::I8(5)]);
    }

    #[test]
    fn void_and_null_returns() {
        let registry = registry();
        let mut echo = Echo {
            name: String::from("x"),
            ..Echo::default()
        };

        let reset = invoker(&registry, "Reset", &[]);
        assert_eq!(reset.invoke(Some(&mut echo), &mut []), Ok(None));
        assert_eq!(echo.name, "");

        let nothing = invoker(&registry, "Nothing", &[]);
        assert_eq!(nothing.invoke(Some(&mut echo), &mut []), Ok(Some(Value::Null)));
    }

    #[test]
    fn static_method_ignores_target() {
        let registry = registry();
        let add = invoker(&registry, "Add", &[TypeRef::of::<i32>(), TypeRef::of::<i32>()]);
        let mut args = [Value::I32(2), Value::I32(3)];
        assert_eq!(add.invoke(None, &mut args), Ok(Some(Value::I32(5))));
    }

    #[test]
    fn failures_leave_arguments_untouched() {
        let registry = registry();
        let swap = invoker(&registry, "Swap", &[TypeRef::of::<String>()]);

        let mut args = [Value::from("test"), Value::Null];
        assert!(matches!(
            swap.invoke(Some(&mut Echo::default()), &mut args),
            Err(AccessError::ArityMismatch { expected: 1, actual: 2, .. })
        ));

        let mut args = [Value::from("test")];
        assert!(matches!(
            swap.invoke(None, &mut args),
            Err(AccessError::InvalidTarget { found: TargetFound::Missing, .. })
        ));
        assert!(matches!(
            swap.invoke(Some(&mut Employee::default()), &mut args),
            Err(AccessError::InvalidTarget { found: TargetFound::Unrelated, .. })
        ));

        let mut args = [Value::I32(1)];
        assert!(matches!(
            swap.invoke(Some(&mut Echo::default()), &mut args),
            Err(AccessError::ValueConversion(_))
        ));
        assert_eq!(args, [Value::I32(1)]);
    }

    #[test]
    fn generic_method_must_be_closed() {
        let registry = registry();
        let open = registry.generic_method(TypeId::of::<Echo>(), "Identity").unwrap();
        assert!(matches!(
            compile_method(&registry, &open),
            Err(AccessError::OpenGenericMethod { arity: 1, .. })
        ));

        let closed = registry.close_generic(&open, &[TypeRef::of::<String>()]).unwrap();
        let identity = compile_method(&registry, &closed).unwrap();
        let mut args = [Value::from("same")];
        let result = identity.invoke(Some(&mut Echo::default()), &mut args);
        assert_eq!(result, Ok(Some(Value::from("same"))));
    }

    #[test]
    fn shared_overload_binds_its_own_body() {
        let registry = registry();
        let shared = invoker(&registry, "Share", &[TypeRef::of::<Arc<String>>()]);
        let plain = invoker(&registry, "Share", &[TypeRef::of::<String>()]);
        assert!(!shared.ptr_eq(&plain));

        let mut args = [Value::from(Arc::new(String::from("abc")))];
        let result = shared.invoke(Some(&mut Echo::default()), &mut args);
        assert_eq!(result, Ok(Some(Value::from("shared abc"))));

        let mut args = [Value::from("abc")];
        let result = plain.invoke(Some(&mut Echo::default()), &mut args);
        assert_eq!(result, Ok(Some(Value::from("plain abc"))));
    }

    #[test]
    fn object_arguments_keep_identity() {
        let registry = registry();
        let describe = invoker(&registry, "Describe", &[TypeRef::of::<Value>()]);
        let object = Object::new(Arc::new(7_u64));
        let mut args = [Value::Object(object)];
        let result = describe.invoke(Some(&mut Echo::default()), &mut args).unwrap();
        assert_eq!(result, Some(Value::from("<u64>")));
    }
}
