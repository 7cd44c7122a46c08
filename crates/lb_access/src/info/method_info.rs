use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use core::marker::PhantomData;

use crate::AccessError;
use crate::compile::Frame;
use crate::info::Visibility;
use crate::value::{Boxable, ShortName, TypeRef, Value};

// -----------------------------------------------------------------------------
// Parameters

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamMode {
    /// Read from the argument slot, never written back.
    Value,
    /// Read from the argument slot and written back after the call.
    Ref,
    /// Starts as `Null`, written back after the call.
    Out,
}

impl ParamMode {
    /// Whether the slot receives the callee's final value.
    #[inline]
    pub const fn writes_back(self) -> bool {
        !matches!(self, Self::Value)
    }
}

/// A declared method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    name: &'static str,
    ty: TypeRef,
    mode: ParamMode,
}

impl ParamInfo {
    #[inline]
    pub fn new(name: &'static str, ty: TypeRef, mode: ParamMode) -> Self {
        Self { name, ty, mode }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn mode(&self) -> ParamMode {
        self.mode
    }
}

impl fmt::Display for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ParamMode::Value => write!(f, "{}", self.ty),
            ParamMode::Ref => write!(f, "ref {}", self.ty),
            ParamMode::Out => write!(f, "out {}", self.ty),
        }
    }
}

// -----------------------------------------------------------------------------
// RawMethod

/// A type-erased method body.
pub trait RawMethod: Send + Sync + 'static {
    /// Runs the body against `target`, already upcast to the declaring type.
    ///
    /// `frame` holds the coerced arguments. Returns `None` if the method is an
    /// instance method and `target` is missing or of another type. The inner
    /// `None` is a void return.
    fn call(
        &self,
        target: Option<&mut dyn Any>,
        frame: &mut Frame,
    ) -> Option<Result<Option<Value>, AccessError>>;
}

struct InstanceBody<T, F> {
    body: F,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T, F> RawMethod for InstanceBody<T, F>
where
    T: Any + Send + Sync,
    F: Fn(&mut T, &mut Frame) -> Result<Option<Value>, AccessError> + Send + Sync + 'static,
{
    fn call(
        &self,
        target: Option<&mut dyn Any>,
        frame: &mut Frame,
    ) -> Option<Result<Option<Value>, AccessError>> {
        let target = target?.downcast_mut::<T>()?;
        Some((self.body)(target, frame))
    }
}

struct StaticBody<F>(F);

impl<F> RawMethod for StaticBody<F>
where
    F: Fn(&mut Frame) -> Result<Option<Value>, AccessError> + Send + Sync + 'static,
{
    #[inline]
    fn call(
        &self,
        _: Option<&mut dyn Any>,
        frame: &mut Frame,
    ) -> Option<Result<Option<Value>, AccessError>> {
        Some((self.0)(frame))
    }
}

// -----------------------------------------------------------------------------
// MethodInfo

/// A registered, non-generic method or one instantiation of a generic method.
#[derive(Clone)]
pub struct MethodInfo {
    name: &'static str,
    visibility: Visibility,
    declaring: TypeId,
    declaring_name: ShortName,
    is_static: bool,
    params: Arc<[ParamInfo]>,
    return_type: Option<TypeRef>,
    body: Arc<dyn RawMethod>,
}

impl MethodInfo {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The type this method was built for.
    #[inline]
    pub fn declaring(&self) -> TypeId {
        self.declaring
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn params(&self) -> &Arc<[ParamInfo]> {
        &self.params
    }

    /// `None` for a void method.
    #[inline]
    pub fn return_type(&self) -> Option<TypeRef> {
        self.return_type
    }

    #[inline]
    pub fn body(&self) -> &Arc<dyn RawMethod> {
        &self.body
    }

    /// Whether the parameter types equal `param_types`, in order.
    pub fn has_signature(&self, param_types: &[TypeRef]) -> bool {
        self.params.len() == param_types.len()
            && self.params.iter().zip(param_types).all(|(p, ty)| p.ty == *ty)
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.declaring_name, self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(param, f)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("declaring", &self.declaring_name)
            .field("is_static", &self.is_static)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Builders

macro_rules! impl_param_builders {
    ($builder:ident) => {
        impl<T: Any + Send + Sync> $builder<T> {
            /// Adds a by-value parameter of type `P`.
            #[inline]
            pub fn param<P: Boxable>(mut self, name: &'static str) -> Self {
                self.params.push(ParamInfo::new(name, P::type_ref(), ParamMode::Value));
                self
            }

            /// Adds a by-reference parameter of type `P`.
            #[inline]
            pub fn ref_param<P: Boxable>(mut self, name: &'static str) -> Self {
                self.params.push(ParamInfo::new(name, P::type_ref(), ParamMode::Ref));
                self
            }

            /// Adds an output parameter of type `P`.
            #[inline]
            pub fn out_param<P: Boxable>(mut self, name: &'static str) -> Self {
                self.params.push(ParamInfo::new(name, P::type_ref(), ParamMode::Out));
                self
            }

            fn finish(
                self,
                is_static: bool,
                return_type: Option<TypeRef>,
                body: Arc<dyn RawMethod>,
            ) -> MethodInfo {
                MethodInfo {
                    name: self.name,
                    visibility: self.visibility,
                    declaring: TypeId::of::<T>(),
                    declaring_name: ShortName::of::<T>(),
                    is_static,
                    params: Arc::from(self.params),
                    return_type,
                    body,
                }
            }
        }
    };
}

/// Builds an instance [`MethodInfo`] of `T`.
///
/// Parameters are declared in order, then `returns` or `returns_void`
/// attaches the body. The body reads and writes arguments through the [`Frame`].
///
/// # Examples
///
/// ```
/// use lb_access::info::{Method, Visibility};
///
/// struct Parser;
///
/// let info = Method::<Parser>::new("TryParse", Visibility::Public)
///     .param::<String>("text")
///     .out_param::<i32>("result")
///     .returns(|_, frame| {
///         let parsed = frame.get::<String>(0)?.parse::<i32>();
///         frame.set(1, *parsed.as_ref().unwrap_or(&0))?;
///         Ok(parsed.is_ok())
///     });
///
/// assert_eq!(info.to_string(), "Parser::TryParse(String, out i32)");
/// ```
pub struct Method<T> {
    name: &'static str,
    visibility: Visibility,
    params: Vec<ParamInfo>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Any + Send + Sync> Method<T> {
    #[inline]
    pub fn new(name: &'static str, visibility: Visibility) -> Self {
        Self {
            name,
            visibility,
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Attaches a body returning `R`.
    pub fn returns<R, F>(self, body: F) -> MethodInfo
    where
        R: Boxable,
        F: Fn(&mut T, &mut Frame) -> Result<R, AccessError> + Send + Sync + 'static,
    {
        let body = move |target: &mut T, frame: &mut Frame| {
            body(target, frame).map(|value| Some(value.into_value()))
        };
        let body = InstanceBody {
            body,
            _marker: PhantomData,
        };
        self.finish(false, Some(R::type_ref()), Arc::new(body))
    }

    /// Attaches a body returning nothing.
    pub fn returns_void<F>(self, body: F) -> MethodInfo
    where
        F: Fn(&mut T, &mut Frame) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        let body =
            move |target: &mut T, frame: &mut Frame| body(target, frame).map(|()| None::<Value>);
        let body = InstanceBody {
            body,
            _marker: PhantomData,
        };
        self.finish(false, None, Arc::new(body))
    }
}

impl_param_builders!(Method);

/// Builds a static [`MethodInfo`] declared on `T`.
pub struct StaticMethod<T> {
    name: &'static str,
    visibility: Visibility,
    params: Vec<ParamInfo>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Any + Send + Sync> StaticMethod<T> {
    #[inline]
    pub fn new(name: &'static str, visibility: Visibility) -> Self {
        Self {
            name,
            visibility,
            params: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn returns<R, F>(self, body: F) -> MethodInfo
    where
        R: Boxable,
        F: Fn(&mut Frame) -> Result<R, AccessError> + Send + Sync + 'static,
    {
        let body = move |frame: &mut Frame| body(frame).map(|value| Some(value.into_value()));
        self.finish(true, Some(R::type_ref()), Arc::new(StaticBody(body)))
    }

    pub fn returns_void<F>(self, body: F) -> MethodInfo
    where
        F: Fn(&mut Frame) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        let body = move |frame: &mut Frame| body(frame).map(|()| None::<Value>);
        self.finish(true, None, Arc::new(StaticBody(body)))
    }
}

impl_param_builders!(StaticMethod);

// -----------------------------------------------------------------------------
// Generic methods

/// A generic method definition with its registered instantiations.
///
/// Each instantiation is an ordinary [`MethodInfo`], keyed by its type arguments.
#[derive(Clone)]
pub struct GenericMethodInfo {
    name: &'static str,
    visibility: Visibility,
    is_static: bool,
    type_params: &'static [&'static str],
    instances: Vec<(Box<[TypeRef]>, MethodInfo)>,
}

impl GenericMethodInfo {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn type_params(&self) -> &'static [&'static str] {
        self.type_params
    }

    /// The number of type parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.type_params.len()
    }

    /// Returns the instantiation closed over exactly `type_args`.
    pub fn instance(&self, type_args: &[TypeRef]) -> Option<&MethodInfo> {
        self.instances
            .iter()
            .find(|(args, _)| **args == *type_args)
            .map(|(_, method)| method)
    }

    pub fn instances(&self) -> impl ExactSizeIterator<Item = (&[TypeRef], &MethodInfo)> {
        self.instances.iter().map(|(args, method)| (&**args, method))
    }
}

impl fmt::Debug for GenericMethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericMethodInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .field("type_params", &self.type_params)
            .field("instances", &self.instances.len())
            .finish()
    }
}

/// Builds a [`GenericMethodInfo`] of `T`.
///
/// # Examples
///
/// ```
/// use lb_access::info::{GenericMethod, Method, Visibility};
/// use lb_access::TypeRef;
///
/// struct Store;
///
/// let identity = GenericMethod::<Store>::new("Identity", Visibility::Public, &["T"])
///     .instance::<i32>(
///         Method::<Store>::new("Identity", Visibility::Public)
///             .param::<i32>("value")
///             .returns(|_, frame| frame.get::<i32>(0)),
///     )
///     .build();
///
/// assert_eq!(identity.arity(), 1);
/// assert!(identity.instance(&[TypeRef::of::<i32>()]).is_some());
/// assert!(identity.instance(&[TypeRef::of::<u8>()]).is_none());
/// ```
pub struct GenericMethod<T> {
    info: GenericMethodInfo,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Any + Send + Sync> GenericMethod<T> {
    #[inline]
    pub fn new(
        name: &'static str,
        visibility: Visibility,
        type_params: &'static [&'static str],
    ) -> Self {
        Self {
            info: GenericMethodInfo {
                name,
                visibility,
                is_static: false,
                type_params,
                instances: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// Registers the instantiation for a single type parameter bound to `A`.
    #[inline]
    pub fn instance<A: Boxable>(self, method: MethodInfo) -> Self {
        self.instance_with(&[A::type_ref()], method)
    }

    /// Registers the instantiation for `type_args`.
    ///
    /// # Panics
    ///
    /// Panics if the number of type arguments differs from the number of type
    /// parameters, or if `method` has another name or declaring type.
    pub fn instance_with(mut self, type_args: &[TypeRef], method: MethodInfo) -> Self {
        let info = &mut self.info;
        assert_eq!(
            type_args.len(),
            info.type_params.len(),
            "`{}` takes {} type arguments",
            info.name,
            info.type_params.len(),
        );
        assert!(
            method.name == info.name && method.declaring == TypeId::of::<T>(),
            "`{method}` is not an instantiation of `{}::{}`",
            ShortName::of::<T>(),
            info.name,
        );
        info.is_static = method.is_static;
        info.instances.push((Box::from(type_args), method));
        self
    }

    #[inline]
    pub fn build(self) -> GenericMethodInfo {
        self.info
    }
}
