use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::marker::PhantomData;

use crate::info::{BaseInfo, ConstructorInfo, FieldInfo, GenericMethod, GenericMethodInfo};
use crate::info::{MethodInfo, Property, PropertyInfo, StaticProperty, TypeKind, Visibility};
use crate::registry::Described;
use crate::value::{Boxable, ShortName};

// -----------------------------------------------------------------------------
// TypeInfo

/// Everything registered about one type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    id: TypeId,
    name: ShortName,
    kind: TypeKind,
    base: Option<BaseInfo>,
    fields: Vec<FieldInfo>,
    properties: Vec<PropertyInfo>,
    methods: Vec<MethodInfo>,
    generic_methods: Vec<GenericMethodInfo>,
    constructor: Option<ConstructorInfo>,
}

impl TypeInfo {
    fn empty(id: TypeId, name: ShortName, kind: TypeKind) -> Self {
        Self {
            id,
            name,
            kind,
            base: None,
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            generic_methods: Vec::new(),
            constructor: None,
        }
    }

    /// Starts describing `T`, as a [`TypeKind::Class`] by default.
    #[inline]
    pub fn builder<T: Any + Send + Sync>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder {
            info: Self::empty(TypeId::of::<T>(), ShortName::of::<T>(), TypeKind::Class),
            _marker: PhantomData,
        }
    }

    /// Describes a trait object type, which has no members and no constructor.
    ///
    /// # Examples
    ///
    /// ```
    /// use lb_access::info::{TypeInfo, TypeKind};
    ///
    /// trait Shape {}
    ///
    /// let info = TypeInfo::interface::<dyn Shape>();
    /// assert_eq!(info.kind(), TypeKind::Interface);
    /// assert!(info.constructor().is_none());
    /// ```
    #[inline]
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::empty(TypeId::of::<I>(), ShortName::of::<I>(), TypeKind::Interface)
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> ShortName {
        self.name
    }

    /// The full path, such as `my_crate::model::Invoice`.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.name.full()
    }

    /// The last path segment, such as `Invoice`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.name.ident()
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn base(&self) -> Option<&BaseInfo> {
        self.base.as_ref()
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    #[inline]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    #[inline]
    pub fn generic_methods(&self) -> &[GenericMethodInfo] {
        &self.generic_methods
    }

    #[inline]
    pub fn constructor(&self) -> Option<&ConstructorInfo> {
        self.constructor.as_ref()
    }

    /// Returns the field declared on this type with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Returns the property declared on this type with the given name.
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Every non-generic overload declared on this type with the given name.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodInfo> {
        self.methods.iter().filter(move |m| m.name() == name)
    }

    pub fn generic_method(&self, name: &str) -> Option<&GenericMethodInfo> {
        self.generic_methods.iter().find(|m| m.name() == name)
    }
}

// -----------------------------------------------------------------------------
// TypeInfoBuilder

/// Describes the members of `T`, see [`TypeInfo::builder`].
///
/// Member types are checked here, where `T` and every value type are still
/// known, and erased in the built [`TypeInfo`].
pub struct TypeInfoBuilder<T> {
    info: TypeInfo,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeInfoBuilder<T> {
    #[inline]
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.info.kind = kind;
        self
    }

    /// Adds an instance field, reached through a pair of field projections.
    pub fn field<V: Boxable>(
        mut self,
        name: &'static str,
        visibility: Visibility,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self {
        let field = FieldInfo::instance(name, visibility, get, get_mut);
        self.info.fields.push(field);
        self
    }

    /// Adds a static field, usually backed by an atomic or a lock.
    pub fn static_field<V: Boxable>(
        mut self,
        name: &'static str,
        visibility: Visibility,
        get: fn() -> V,
        set: fn(V),
    ) -> Self {
        let field = FieldInfo::new_static(name, visibility, get, set);
        self.info.fields.push(field);
        self
    }

    pub fn property<V: Boxable>(mut self, property: Property<T, V>) -> Self {
        self.info.properties.push(property.into_info());
        self
    }

    pub fn static_property<V: Boxable>(mut self, property: StaticProperty<V>) -> Self {
        self.info.properties.push(property.into_info());
        self
    }

    /// Adds a method built with [`Method`](crate::info::Method)
    /// or [`StaticMethod`](crate::info::StaticMethod).
    ///
    /// # Panics
    ///
    /// Panics if the method was built for another type.
    pub fn method(mut self, method: MethodInfo) -> Self {
        assert!(
            method.declaring() == self.info.id,
            "`{method}` cannot be registered on `{}`",
            self.info.name,
        );
        self.info.methods.push(method);
        self
    }

    pub fn generic_method(mut self, method: GenericMethod<T>) -> Self {
        self.info.generic_methods.push(method.build());
        self
    }

    /// Sets the parameterless constructor, whatever its visibility.
    #[inline]
    pub fn constructor(mut self, visibility: Visibility, f: fn() -> T) -> Self {
        self.info.constructor = Some(ConstructorInfo::new(visibility, f));
        self
    }

    #[inline]
    pub fn default_constructor(self, visibility: Visibility) -> Self
    where
        T: Default,
    {
        self.constructor(visibility, T::default)
    }

    /// Sets the base type `B`, embedded in `T`.
    #[inline]
    pub fn base<B: Described>(mut self, get: fn(&T) -> &B, get_mut: fn(&mut T) -> &mut B) -> Self {
        self.info.base = Some(BaseInfo::new(get, get_mut));
        self
    }

    #[inline]
    pub fn build(self) -> TypeInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use super::TypeInfo;
    use crate::info::{Method, TypeKind, Visibility};

    struct Left;
    struct Right;

    #[test]
    #[should_panic = "cannot be registered"]
    fn method_of_another_type_panics() {
        let method = Method::<Left>::new("Go", Visibility::Public).returns_void(|_, _| Ok(()));
        TypeInfo::builder::<Right>().method(method);
    }

    #[test]
    fn names_and_kind() {
        let info = TypeInfo::builder::<Left>().kind(TypeKind::Struct).build();
        assert_eq!(info.type_name(), "Left");
        assert!(info.type_path().ends_with("::Left"));
        assert_eq!(info.kind(), TypeKind::Struct);
        assert!(info.base().is_none());
    }
}
