use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::AccessError;
use crate::info::{ConstructorInfo, FieldInfo, GenericMethodInfo, MemberKind, MethodInfo};
use crate::info::{ParamInfo, ParamMode, PropertyInfo, TypeInfo, Visibility};
use crate::registry::TypeRegistry;
use crate::value::{ShortName, TypeKey, TypeRef};

// -----------------------------------------------------------------------------
// MemberKey

/// The identity of one parameter in a [`MemberKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamKey {
    pub ty: TypeKey,
    pub mode: ParamMode,
}

impl From<&ParamInfo> for ParamKey {
    #[inline]
    fn from(param: &ParamInfo) -> Self {
        Self {
            ty: param.ty().key(),
            mode: param.mode(),
        }
    }
}

/// The hashed identity of a member.
///
/// A pure function of the declaring type, the name, the kind, the static
/// flag, the parameter types and the generic type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
    declaring: TypeId,
    name: &'static str,
    kind: MemberKind,
    is_static: bool,
    params: Box<[ParamKey]>,
    generic_arity: usize,
    type_args: Box<[TypeKey]>,
}

impl MemberKey {
    #[inline]
    pub fn declaring(&self) -> TypeId {
        self.declaring
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[inline]
    pub fn params(&self) -> &[ParamKey] {
        &self.params
    }

    #[inline]
    pub fn generic_arity(&self) -> usize {
        self.generic_arity
    }

    #[inline]
    pub fn type_args(&self) -> &[TypeKey] {
        &self.type_args
    }

    fn matches_method(&self, method: &MethodInfo) -> bool {
        method.name() == self.name
            && method.is_static() == self.is_static
            && method.params().len() == self.params.len()
            && method.params().iter().map(ParamKey::from).eq(self.params.iter().copied())
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// A resolved member, ready to be compiled.
///
/// Equality and hashing only use the [`MemberKey`], the rest is display data.
/// Obtained from the resolver methods of [`TypeRegistry`].
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
    key: MemberKey,
    declaring_name: ShortName,
    visibility: Visibility,
    value_type: Option<TypeRef>,
    params: Arc<[ParamInfo]>,
    type_params: &'static [&'static str],
    type_args: Box<[TypeRef]>,
}

impl MemberDescriptor {
    fn data_key(
        owner: &TypeInfo,
        kind: MemberKind,
        name: &'static str,
        is_static: bool,
    ) -> MemberKey {
        MemberKey {
            declaring: owner.id(),
            name,
            kind,
            is_static,
            params: Box::new([]),
            generic_arity: 0,
            type_args: Box::new([]),
        }
    }

    pub(crate) fn of_field(owner: &TypeInfo, field: &FieldInfo) -> Self {
        Self {
            key: Self::data_key(owner, MemberKind::Field, field.name(), field.is_static()),
            declaring_name: owner.name(),
            visibility: field.visibility(),
            value_type: Some(field.ty()),
            params: Arc::new([]),
            type_params: &[],
            type_args: Box::new([]),
        }
    }

    pub(crate) fn of_property(owner: &TypeInfo, property: &PropertyInfo) -> Self {
        Self {
            key: Self::data_key(
                owner,
                MemberKind::Property,
                property.name(),
                property.is_static(),
            ),
            declaring_name: owner.name(),
            visibility: property.visibility(),
            value_type: Some(property.ty()),
            params: Arc::new([]),
            type_params: &[],
            type_args: Box::new([]),
        }
    }

    pub(crate) fn of_constructor(owner: &TypeInfo, constructor: &ConstructorInfo) -> Self {
        Self {
            key: Self::data_key(owner, MemberKind::Constructor, "new", true),
            declaring_name: owner.name(),
            visibility: constructor.visibility(),
            value_type: None,
            params: Arc::new([]),
            type_params: &[],
            type_args: Box::new([]),
        }
    }

    pub(crate) fn of_method(owner: &TypeInfo, method: &MethodInfo) -> Self {
        Self {
            key: MemberKey {
                declaring: owner.id(),
                name: method.name(),
                kind: MemberKind::Method,
                is_static: method.is_static(),
                params: method.params().iter().map(ParamKey::from).collect(),
                generic_arity: 0,
                type_args: Box::new([]),
            },
            declaring_name: owner.name(),
            visibility: method.visibility(),
            value_type: method.return_type(),
            params: Arc::clone(method.params()),
            type_params: &[],
            type_args: Box::new([]),
        }
    }

    pub(crate) fn of_open_generic(owner: &TypeInfo, generic: &GenericMethodInfo) -> Self {
        Self {
            key: MemberKey {
                declaring: owner.id(),
                name: generic.name(),
                kind: MemberKind::Method,
                is_static: generic.is_static(),
                params: Box::new([]),
                generic_arity: generic.arity(),
                type_args: Box::new([]),
            },
            declaring_name: owner.name(),
            visibility: generic.visibility(),
            value_type: None,
            params: Arc::new([]),
            type_params: generic.type_params(),
            type_args: Box::new([]),
        }
    }

    fn of_closed_generic(
        owner: &TypeInfo,
        generic: &GenericMethodInfo,
        type_args: &[TypeRef],
        method: &MethodInfo,
    ) -> Self {
        let mut descriptor = Self::of_method(owner, method);
        descriptor.key.generic_arity = generic.arity();
        descriptor.key.type_args = type_args.iter().map(TypeRef::key).collect();
        descriptor.type_params = generic.type_params();
        descriptor.type_args = Box::from(type_args);
        descriptor
    }

    /// The error for a descriptor whose member cannot be found.
    pub(crate) fn not_found(&self) -> AccessError {
        let member = match self.key.kind {
            MemberKind::Field | MemberKind::Property => String::from(self.key.name),
            MemberKind::Constructor | MemberKind::Method => {
                signature(self.key.name, &self.params[..])
            }
        };
        AccessError::MemberNotFound {
            type_name: self.declaring_name,
            member,
        }
    }

    #[inline]
    pub fn key(&self) -> &MemberKey {
        &self.key
    }

    #[inline]
    pub fn declaring(&self) -> TypeId {
        self.key.declaring
    }

    #[inline]
    pub fn declaring_name(&self) -> ShortName {
        self.declaring_name
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.key.name
    }

    #[inline]
    pub fn kind(&self) -> MemberKind {
        self.key.kind
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.key.is_static
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The field or property type, or the method return type.
    ///
    /// `None` for void methods, constructors and open generic methods.
    #[inline]
    pub fn value_type(&self) -> Option<TypeRef> {
        self.value_type
    }

    #[inline]
    pub fn params(&self) -> &Arc<[ParamInfo]> {
        &self.params
    }

    #[inline]
    pub fn type_args(&self) -> &[TypeRef] {
        &self.type_args
    }

    /// Whether this is a generic method definition with unbound type parameters.
    #[inline]
    pub fn is_open_generic(&self) -> bool {
        self.key.generic_arity > self.key.type_args.len()
    }
}

impl PartialEq for MemberDescriptor {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MemberDescriptor {}

impl Hash for MemberDescriptor {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_name, self.key.name)?;
        if self.key.generic_arity > 0 {
            f.write_str("<")?;
            if self.type_args.is_empty() {
                f.write_str(&self.type_params.join(", "))?;
            } else {
                for (index, arg) in self.type_args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(arg, f)?;
                }
            }
            f.write_str(">")?;
            if self.is_open_generic() {
                return Ok(());
            }
        }
        match self.key.kind {
            MemberKind::Field | MemberKind::Property => Ok(()),
            MemberKind::Constructor | MemberKind::Method => {
                f.write_str("(")?;
                for (index, param) in self.params.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(param, f)?;
                }
                f.write_str(")")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Resolver

/// The metadata a [`MemberKey`] points at.
pub(crate) enum Resolved<'a> {
    Field(&'a FieldInfo),
    Property(&'a PropertyInfo),
    Method(&'a MethodInfo),
    Constructor(&'a ConstructorInfo),
}

pub(crate) fn signature(name: &str, params: &[impl fmt::Display]) -> String {
    let params: Vec<String> = params.iter().map(|param| format!("{param}")).collect();
    format!("{name}({})", params.join(", "))
}

impl TypeRegistry {
    fn not_found(&self, type_id: TypeId, member: String) -> AccessError {
        AccessError::MemberNotFound {
            type_name: self.name_of(type_id),
            member,
        }
    }

    /// Resolves the field `name` of `type_id` or of its nearest base type declaring it.
    ///
    /// Static and instance fields of every visibility are searched.
    pub fn field(&self, type_id: TypeId, name: &str) -> Result<MemberDescriptor, AccessError> {
        self.ancestors(type_id)
            .find_map(|owner| Some(MemberDescriptor::of_field(owner, owner.field(name)?)))
            .ok_or_else(|| self.not_found(type_id, String::from(name)))
    }

    /// Resolves the property `name` of `type_id` or of its nearest base type declaring it.
    pub fn property(&self, type_id: TypeId, name: &str) -> Result<MemberDescriptor, AccessError> {
        self.ancestors(type_id)
            .find_map(|owner| Some(MemberDescriptor::of_property(owner, owner.property(name)?)))
            .ok_or_else(|| self.not_found(type_id, String::from(name)))
    }

    /// Resolves the most-derived field or property called `name`.
    ///
    /// A field wins over a property declared on the same type.
    pub fn member(&self, type_id: TypeId, name: &str) -> Result<MemberDescriptor, AccessError> {
        self.ancestors(type_id)
            .find_map(|owner| Self::data_member(owner, name))
            .ok_or_else(|| self.not_found(type_id, String::from(name)))
    }

    pub(crate) fn data_member(owner: &TypeInfo, name: &str) -> Option<MemberDescriptor> {
        if let Some(field) = owner.field(name) {
            return Some(MemberDescriptor::of_field(owner, field));
        }
        owner
            .property(name)
            .map(|property| MemberDescriptor::of_property(owner, property))
    }

    /// Resolves the non-generic method `name` whose parameter types are exactly `param_types`.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::any::TypeId;
    /// use lb_access::TypeRef;
    /// use lb_access::info::{Method, TypeInfo, Visibility};
    /// use lb_access::registry::TypeRegistry;
    ///
    /// struct Calc;
    ///
    /// let mut registry = TypeRegistry::empty();
    /// registry.insert(
    ///     TypeInfo::builder::<Calc>()
    ///         .method(
    ///             Method::<Calc>::new("Double", Visibility::Private)
    ///                 .param::<i32>("x")
    ///                 .returns(|_, frame| Ok(frame.get::<i32>(0)? * 2)),
    ///         )
    ///         .build(),
    /// );
    ///
    /// let id = TypeId::of::<Calc>();
    /// let double = registry.method(id, "Double", &[TypeRef::of::<i32>()]).unwrap();
    /// assert_eq!(double.to_string(), "Calc::Double(i32)");
    /// assert!(registry.method(id, "Double", &[TypeRef::of::<i64>()]).is_err());
    /// ```
    pub fn method(
        &self,
        type_id: TypeId,
        name: &str,
        param_types: &[TypeRef],
    ) -> Result<MemberDescriptor, AccessError> {
        self.ancestors(type_id)
            .find_map(|owner| {
                owner
                    .methods_named(name)
                    .find(|method| method.has_signature(param_types))
                    .map(|method| MemberDescriptor::of_method(owner, method))
            })
            .ok_or_else(|| self.not_found(type_id, signature(name, param_types)))
    }

    /// Every non-generic overload of `name` on `type_id` and its base types,
    /// most-derived first.
    ///
    /// A base overload whose signature is re-declared by a more-derived type is hidden.
    pub fn methods(&self, type_id: TypeId, name: &str) -> Vec<MemberDescriptor> {
        let mut found: Vec<MemberDescriptor> = Vec::new();
        for owner in self.ancestors(type_id) {
            for method in owner.methods_named(name) {
                let descriptor = MemberDescriptor::of_method(owner, method);
                let hidden = found
                    .iter()
                    .any(|seen| seen.key.params == descriptor.key.params);
                if !hidden {
                    found.push(descriptor);
                }
            }
        }
        found
    }

    /// Resolves the generic method definition `name`, still open.
    pub fn generic_method(
        &self,
        type_id: TypeId,
        name: &str,
    ) -> Result<MemberDescriptor, AccessError> {
        self.ancestors(type_id)
            .find_map(|owner| {
                let generic = owner.generic_method(name)?;
                Some(MemberDescriptor::of_open_generic(owner, generic))
            })
            .ok_or_else(|| self.not_found(type_id, String::from(name)))
    }

    /// Closes a generic method definition over `type_args`.
    ///
    /// Fails with [`AccessError::MemberNotFound`] if the number of type
    /// arguments is wrong or no instantiation was registered for them.
    pub fn close_generic(
        &self,
        open: &MemberDescriptor,
        type_args: &[TypeRef],
    ) -> Result<MemberDescriptor, AccessError> {
        let declaring = open.declaring();
        let not_found = || {
            let args: Vec<String> = type_args.iter().map(|ty| format!("{ty}")).collect();
            self.not_found(declaring, format!("{}<{}>", open.name(), args.join(", ")))
        };
        let owner = self.get(declaring).ok_or_else(not_found)?;
        let generic = owner.generic_method(open.name()).ok_or_else(not_found)?;
        if generic.arity() != type_args.len() {
            return Err(not_found());
        }
        let method = generic.instance(type_args).ok_or_else(not_found)?;
        Ok(MemberDescriptor::of_closed_generic(owner, generic, type_args, method))
    }

    /// Resolves the parameterless constructor of `type_id`.
    ///
    /// Fails with [`AccessError::MemberNotFound`] for an unregistered type and with
    /// [`AccessError::NoParameterlessConstructor`] for a type without constructor.
    pub fn constructor(&self, type_id: TypeId) -> Result<MemberDescriptor, AccessError> {
        let owner = self
            .get(type_id)
            .ok_or_else(|| self.not_found(type_id, String::from("new")))?;
        match owner.constructor() {
            Some(constructor) if owner.kind().is_instantiable() => {
                Ok(MemberDescriptor::of_constructor(owner, constructor))
            }
            _ => Err(AccessError::NoParameterlessConstructor {
                type_name: owner.name(),
            }),
        }
    }

    /// Finds the metadata a key was built from.
    pub(crate) fn resolve(&self, key: &MemberKey) -> Option<Resolved<'_>> {
        let owner = self.get(key.declaring)?;
        match key.kind {
            MemberKind::Field => owner
                .fields()
                .iter()
                .find(|f| f.name() == key.name && f.is_static() == key.is_static)
                .map(Resolved::Field),
            MemberKind::Property => owner
                .properties()
                .iter()
                .find(|p| p.name() == key.name && p.is_static() == key.is_static)
                .map(Resolved::Property),
            MemberKind::Constructor => owner.constructor().map(Resolved::Constructor),
            MemberKind::Method if key.generic_arity == 0 => owner
                .methods()
                .iter()
                .find(|m| key.matches_method(m))
                .map(Resolved::Method),
            MemberKind::Method => {
                let generic = owner.generic_method(key.name)?;
                if generic.arity() != key.type_args.len() {
                    return None;
                }
                let bound = |args: &[TypeRef]| {
                    args.iter().map(TypeRef::key).eq(key.type_args.iter().copied())
                };
                generic
                    .instances()
                    .find(|(args, _)| bound(args))
                    .map(|(_, method)| Resolved::Method(method))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::sync::Arc;
    use core::any::TypeId;

    use crate::AccessError;
    use crate::fixtures::{Echo, Employee, Person, registry};
    use crate::info::MemberKind;
    use crate::value::TypeRef;

    #[test]
    fn same_request_same_key() {
        let registry = registry();
        let a = registry.member(TypeId::of::<Echo>(), "Name").unwrap();
        let b = registry.field(TypeId::of::<Echo>(), "Name").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.kind(), MemberKind::Field);
    }

    #[test]
    fn most_derived_member_wins() {
        let registry = registry();
        let name = registry.member(TypeId::of::<Employee>(), "Name").unwrap();
        assert_eq!(name.declaring(), TypeId::of::<Employee>());
        assert_eq!(name.kind(), MemberKind::Property);

        let age = registry.member(TypeId::of::<Employee>(), "Age").unwrap();
        assert_eq!(age.declaring(), TypeId::of::<Person>());
    }

    #[test]
    fn overload_signatures_are_distinct() {
        let registry = registry();
        let id = TypeId::of::<Echo>();
        let int = registry.method(id, "EchoInternal2", &[TypeRef::of::<i32>()]).unwrap();
        let string = registry
            .method(id, "EchoInternal2", &[TypeRef::of::<alloc::string::String>()])
            .unwrap();
        assert_ne!(int, string);
        assert_eq!(int.to_string(), "Echo::EchoInternal2(i32)");
        assert_eq!(registry.methods(id, "EchoInternal2").len(), 2);
    }

    #[test]
    fn shared_and_plain_parameters_are_distinct() {
        let registry = registry();
        let id = TypeId::of::<Echo>();
        let plain = registry.method(id, "Share", &[TypeRef::of::<String>()]).unwrap();
        let shared = registry.method(id, "Share", &[TypeRef::of::<Arc<String>>()]).unwrap();

        assert_ne!(plain.key(), shared.key());
        assert_eq!(registry.methods(id, "Share").len(), 2);
        assert_eq!(shared.key().params()[0].ty, TypeRef::of::<Arc<String>>().key());
    }

    #[test]
    fn hidden_base_overload_is_skipped() {
        let registry = registry();
        let describe = registry.methods(TypeId::of::<Employee>(), "Describe");
        assert_eq!(describe.len(), 1);
        assert_eq!(describe[0].declaring(), TypeId::of::<Employee>());
    }

    #[test]
    fn generic_close_checks_arguments() {
        let registry = registry();
        let open = registry.generic_method(TypeId::of::<Echo>(), "Identity").unwrap();
        assert!(open.is_open_generic());
        assert_eq!(open.to_string(), "Echo::Identity<T>");

        let closed = registry.close_generic(&open, &[TypeRef::of::<i32>()]).unwrap();
        assert!(!closed.is_open_generic());
        assert_eq!(closed.to_string(), "Echo::Identity<i32>(i32)");

        let missing = registry.close_generic(&open, &[TypeRef::of::<u8>()]);
        assert!(matches!(missing, Err(AccessError::MemberNotFound { .. })));
        let wrong_arity =
            registry.close_generic(&open, &[TypeRef::of::<i32>(), TypeRef::of::<i32>()]);
        assert!(matches!(wrong_arity, Err(AccessError::MemberNotFound { .. })));
    }

    #[test]
    fn missing_member_names_the_type() {
        let registry = registry();
        let err = registry.member(TypeId::of::<Echo>(), "Nope").unwrap_err();
        assert_eq!(err.to_string(), "`Echo` has no member matching `Nope`");
    }
}
