//! Sample types shared by the unit tests.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::sync::atomic::{AtomicI32, Ordering};

use crate::AccessorCache;
use crate::info::{GenericMethod, Method, Property, StaticMethod, StaticProperty};
use crate::info::{TypeInfo, TypeKind, Visibility};
use crate::registry::{Described, TypeRegistry};
use crate::value::{Object, Value};

// -----------------------------------------------------------------------------
// Echo

static TOTAL: AtomicI32 = AtomicI32::new(0);

#[derive(Debug, Default)]
pub(crate) struct Echo {
    pub(crate) name: String,
    pub(crate) secret: i32,
    pub(crate) count: u32,
    pub(crate) label: String,
    pub(crate) nickname: Option<String>,
    pub(crate) rating: Option<i64>,
}

fn echo(name: &'static str, visibility: Visibility) -> Method<Echo> {
    Method::new(name, visibility)
}

impl Described for Echo {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>()
            .field("Name", Visibility::Public, |e| &e.name, |e| &mut e.name)
            .field("Secret", Visibility::Private, |e| &e.secret, |e| &mut e.secret)
            .field("Count", Visibility::Internal, |e| &e.count, |e| &mut e.count)
            .static_field(
                "Total",
                Visibility::Private,
                || TOTAL.load(Ordering::Relaxed),
                |v| TOTAL.store(v, Ordering::Relaxed),
            )
            .property(Property::new("Length", Visibility::Public, |e: &Echo| {
                e.name.len() as u64
            }))
            .property(
                Property::new("Label", Visibility::Public, |e: &Echo| e.label.clone())
                    .setter(Visibility::Private, |e, label| e.label = label),
            )
            .field(
                "Nickname",
                Visibility::Private,
                |e| &e.nickname,
                |e| &mut e.nickname,
            )
            .property(
                Property::new("Rating", Visibility::Public, |e: &Echo| e.rating)
                    .setter(Visibility::Internal, |e, rating| e.rating = rating),
            )
            .static_property(StaticProperty::new("Version", Visibility::Public, || 3_u32))
            .method(
                echo("EchoInternal2", Visibility::Internal)
                    .param::<i32>("value")
                    .returns(|_, frame| Ok(format!("Int: {}", frame.get::<i32>(0)?))),
            )
            .method(
                echo("EchoInternal2", Visibility::Internal)
                    .param::<String>("value")
                    .returns(|_, frame| Ok(format!("String: {}", frame.get::<String>(0)?))),
            )
            .method(
                echo("EchoInternal3", Visibility::Internal)
                    .param::<String>("a")
                    .param::<String>("b")
                    .param::<Option<String>>("c")
                    .returns(|_, _| Ok(String::from("String"))),
            )
            .method(
                echo("EchoInternal3", Visibility::Internal)
                    .param::<String>("a")
                    .param::<i32>("b")
                    .param::<Option<String>>("c")
                    .returns(|_, _| Ok(String::from("Int"))),
            )
            .method(
                echo("TryParse", Visibility::Public)
                    .param::<String>("text")
                    .out_param::<i32>("result")
                    .returns(|_, frame| match frame.get::<String>(0)?.parse::<i32>() {
                        Ok(parsed) => frame.set(1, parsed).map(|()| true),
                        Err(_) => frame.set(1, 0_i32).map(|()| false),
                    }),
            )
            .method(
                echo("Skip", Visibility::Private)
                    .out_param::<String>("never")
                    .returns_void(|_, _| Ok(())),
            )
            .method(
                echo("Swap", Visibility::Private)
                    .ref_param::<String>("text")
                    .returns_void(|_, frame| frame.set(0, String::from("1234"))),
            )
            .method(
                echo("Widen", Visibility::Public)
                    .param::<i64>("value")
                    .returns(|_, frame| Ok(frame.get::<i64>(0)? * 2)),
            )
            .method(echo("Reset", Visibility::Public).returns_void(|e, _| {
                e.name.clear();
                Ok(())
            }))
            .method(
                echo("Nothing", Visibility::Public)
                    .returns(|_, _| Ok(None::<String>)),
            )
            .method(
                echo("Rename", Visibility::Public)
                    .param::<String>("name")
                    .returns_void(|e, frame| {
                        e.name = frame.get(0)?;
                        Ok(())
                    }),
            )
            .method(
                StaticMethod::<Echo>::new("Add", Visibility::Public)
                    .param::<i32>("a")
                    .param::<i32>("b")
                    .returns(|frame| Ok(frame.get::<i32>(0)? + frame.get::<i32>(1)?)),
            )
            .method(
                echo("Describe", Visibility::Public)
                    .param::<Value>("value")
                    .returns(|_, frame| Ok(frame.value(0)?.to_string())),
            )
            .method(
                echo("Share", Visibility::Public)
                    .param::<String>("text")
                    .returns(|_, frame| Ok(format!("plain {}", frame.get::<String>(0)?))),
            )
            .method(
                echo("Share", Visibility::Public)
                    .param::<Arc<String>>("text")
                    .returns(|_, frame| Ok(format!("shared {}", frame.get::<Arc<String>>(0)?))),
            )
            .method(
                echo("Take", Visibility::Public)
                    .param::<Object>("value")
                    .returns(|_, frame| Ok(frame.get::<Object>(0)?.type_name().to_string())),
            )
            .method(
                echo("Maybe", Visibility::Public)
                    .param::<Option<String>>("value")
                    .returns(|_, _| Ok(String::from("string"))),
            )
            .method(
                echo("Maybe", Visibility::Public)
                    .param::<Option<i32>>("value")
                    .returns(|_, _| Ok(String::from("int"))),
            )
            .generic_method(
                GenericMethod::new("Identity", Visibility::Public, &["T"])
                    .instance::<i32>(
                        echo("Identity", Visibility::Public)
                            .param::<i32>("value")
                            .returns(|_, frame| frame.get::<i32>(0)),
                    )
                    .instance::<String>(
                        echo("Identity", Visibility::Public)
                            .param::<String>("value")
                            .returns(|_, frame| frame.get::<String>(0)),
                    ),
            )
            .default_constructor(Visibility::Public)
            .build()
    }
}

// -----------------------------------------------------------------------------
// Person and Employee

#[derive(Debug, Default)]
pub(crate) struct Person {
    pub(crate) name: String,
    pub(crate) age: u32,
}

impl Described for Person {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>()
            .field("Name", Visibility::Public, |p| &p.name, |p| &mut p.name)
            .field("Age", Visibility::Protected, |p| &p.age, |p| &mut p.age)
            .method(
                Method::<Person>::new("Describe", Visibility::Public)
                    .returns(|p, _| Ok(format!("person {}", p.name))),
            )
            .method(
                Method::<Person>::new("Greet", Visibility::Public)
                    .param::<String>("greeting")
                    .returns(|p, frame| {
                        Ok(format!("{}, {}", frame.get::<String>(0)?, p.name))
                    }),
            )
            .default_constructor(Visibility::Public)
            .build()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Employee {
    pub(crate) person: Person,
    pub(crate) company: String,
}

impl Described for Employee {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>()
            .base::<Person>(|e| &e.person, |e| &mut e.person)
            .field("Company", Visibility::Public, |e| &e.company, |e| &mut e.company)
            .property(
                Property::new("Name", Visibility::Public, |e: &Employee| {
                    format!("{} ({})", e.person.name, e.company)
                })
                .setter(Visibility::Public, |e, name| e.person.name = name),
            )
            .method(
                Method::<Employee>::new("Describe", Visibility::Public)
                    .returns(|e, _| Ok(format!("employee {}", e.person.name))),
            )
            .default_constructor(Visibility::Public)
            .build()
    }
}

// -----------------------------------------------------------------------------
// Constructor edge cases

#[derive(Debug)]
pub(crate) struct NoCtor;

impl Described for NoCtor {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>().build()
    }
}

#[derive(Debug)]
pub(crate) struct Hidden {
    pub(crate) created: bool,
}

impl Described for Hidden {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>()
            .kind(TypeKind::Struct)
            .constructor(Visibility::Private, || Hidden { created: true })
            .build()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Abstract;

impl Described for Abstract {
    fn type_info() -> TypeInfo {
        TypeInfo::builder::<Self>()
            .kind(TypeKind::Abstract)
            .default_constructor(Visibility::Protected)
            .build()
    }
}

pub(crate) trait Shape {}

// -----------------------------------------------------------------------------
// Registries

crate::auto_register!(Person);

pub(crate) fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::empty();
    registry.register::<Echo>();
    registry.register::<Employee>();
    registry.register::<NoCtor>();
    registry.register::<Hidden>();
    registry.register::<Abstract>();
    registry.insert(TypeInfo::interface::<dyn Shape>());
    registry
}

pub(crate) fn cache() -> AccessorCache {
    AccessorCache::new(registry())
}

