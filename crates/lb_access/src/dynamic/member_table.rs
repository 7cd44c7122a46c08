use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use lb_utils::hash::HashMap;

use crate::AccessError;
use crate::registry::{MemberDescriptor, TypeRegistry};
use crate::value::ShortName;

/// Everything reachable by name on one type, inherited members included.
///
/// A name declared on several levels of the hierarchy maps to the
/// most-derived declaration. Method overloads are kept side by side unless a
/// derived type re-declares the same parameter list.
#[derive(Debug)]
pub struct MemberTable {
    type_id: TypeId,
    type_name: ShortName,
    data_members: HashMap<&'static str, MemberDescriptor>,
    methods: HashMap<&'static str, Vec<MemberDescriptor>>,
    generic_methods: HashMap<&'static str, MemberDescriptor>,
}

impl MemberTable {
    pub(crate) fn build(registry: &TypeRegistry, type_id: TypeId) -> Self {
        let mut table = Self {
            type_id,
            type_name: registry.name_of(type_id),
            data_members: HashMap::default(),
            methods: HashMap::default(),
            generic_methods: HashMap::default(),
        };

        for owner in registry.ancestors(type_id) {
            for field in owner.fields() {
                table
                    .data_members
                    .entry(field.name())
                    .or_insert_with(|| MemberDescriptor::of_field(owner, field));
            }
            for property in owner.properties() {
                table
                    .data_members
                    .entry(property.name())
                    .or_insert_with(|| MemberDescriptor::of_property(owner, property));
            }
            for method in owner.methods() {
                let descriptor = MemberDescriptor::of_method(owner, method);
                let overloads = table.methods.entry(method.name()).or_default();
                let hidden = overloads
                    .iter()
                    .any(|seen| seen.key().params() == descriptor.key().params());
                if !hidden {
                    overloads.push(descriptor);
                }
            }
            for generic in owner.generic_methods() {
                table
                    .generic_methods
                    .entry(generic.name())
                    .or_insert_with(|| MemberDescriptor::of_open_generic(owner, generic));
            }
        }

        log::debug!(
            "built member table of `{}`: {} data members, {} method names",
            table.type_name,
            table.data_members.len(),
            table.methods.len(),
        );
        table
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> ShortName {
        self.type_name
    }

    /// The field or property `name`.
    pub fn data_member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.data_members.get(name)
    }

    /// Every visible overload of the non-generic method `name`, most-derived first.
    pub fn methods(&self, name: &str) -> &[MemberDescriptor] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The open definition of the generic method `name`.
    pub fn generic_method(&self, name: &str) -> Option<&MemberDescriptor> {
        self.generic_methods.get(name)
    }

    pub(crate) fn not_found(&self, member: &str) -> AccessError {
        AccessError::MemberNotFound {
            type_name: self.type_name,
            member: String::from(member),
        }
    }
}
