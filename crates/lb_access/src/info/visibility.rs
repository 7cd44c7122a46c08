use core::fmt;

/// The declared accessibility of a member.
///
/// Only informative: every member compiles whatever its visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Internal,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::Private => "private",
        })
    }
}

/// What kind of type a [`TypeInfo`](crate::info::TypeInfo) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A reference type, usually shared as `Arc<T>`.
    Class,
    /// A value type, copied in and out.
    Struct,
    /// Never instantiated directly, only through a derived type.
    Abstract,
    /// A trait object type, see [`TypeInfo::interface`](crate::info::TypeInfo::interface).
    Interface,
}

impl TypeKind {
    /// Whether instances of this kind can be constructed.
    #[inline]
    pub const fn is_instantiable(self) -> bool {
        matches!(self, Self::Class | Self::Struct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Constructor,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Field => "field",
            Self::Property => "property",
            Self::Constructor => "constructor",
            Self::Method => "method",
        })
    }
}
