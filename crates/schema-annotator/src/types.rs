//! Type descriptors as seen by the semantic model.
//!
//! A closed sum over the shapes a `generate` result type can take, plus the
//! two non-data terminals (objects and errors) needed to type receivers and
//! error returns. Named references carry only their name; the definition is
//! looked up through [`TypeDefinitions`] so recursive types stay finite.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Nil,
    Boolean,
    Int,
    Byte,
    Float,
    Decimal,
    String,
    /// `json`: any JSON-shaped value
    Json,
    /// `anydata`: any plain data value
    Anydata,
    /// `any`: includes behavioural values, so not data
    Any,
    /// `handle`: opaque host reference
    Handle,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Nil => "()",
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Byte => "byte",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Json => "json",
            Self::Anydata => "anydata",
            Self::Any => "any",
            Self::Handle => "handle",
        }
    }

    fn is_data(self) -> bool {
        !matches!(self, Self::Any | Self::Handle)
    }

    fn is_json(self) -> bool {
        !matches!(self, Self::Anydata | Self::Any | Self::Handle)
    }
}

// ---------------------------------------------------------------------------
// Structured types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub ty: TypeDescriptor,
    pub optional: bool,
}

impl RecordField {
    pub fn required(ty: TypeDescriptor) -> Self {
        Self { ty, optional: false }
    }

    pub fn optional(ty: TypeDescriptor) -> Self {
        Self { ty, optional: true }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordType {
    pub fields: IndexMap<String, RecordField>,
    /// Rest field type of an open record. `None` for closed records (`{| ... |}`).
    pub rest: Option<Box<TypeDescriptor>>,
}

/// Module coordinates of a nominal type: `org/name:version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleId {
    pub org: String,
    pub name: String,
    pub version: String,
}

impl ModuleId {
    pub fn new(org: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.org, self.name, self.version)
    }
}

/// Class or object type. Subtyping is nominal through `includes`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectType {
    pub module: ModuleId,
    pub name: String,
    pub includes: Vec<ObjectType>,
}

impl ObjectType {
    pub fn new(module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
            includes: Vec::new(),
        }
    }

    pub fn including(mut self, parent: ObjectType) -> Self {
        self.includes.push(parent);
        self
    }

    fn is_or_includes(&self, other: &ObjectType) -> bool {
        (self.module == other.module && self.name == other.name)
            || self.includes.iter().any(|inc| inc.is_or_includes(other))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Array(Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Record(RecordType),
    Union(Vec<TypeDescriptor>),
    /// Reference to a named type definition, resolved via [`TypeDefinitions`].
    NamedReference(String),
    Object(ObjectType),
    Error,
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self::NamedReference(name.into())
    }

    pub fn array_of(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn closed_record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, TypeDescriptor)>,
        K: Into<String>,
    {
        Self::Record(RecordType {
            fields: fields
                .into_iter()
                .map(|(k, ty)| (k.into(), RecordField::required(ty)))
                .collect(),
            rest: None,
        })
    }

    pub fn optional(ty: TypeDescriptor) -> Self {
        Self::Union(vec![ty, Self::Scalar(ScalarKind::Nil)])
    }
}

impl From<ScalarKind> for TypeDescriptor {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

/// Lookup of named type definitions within one module.
pub trait TypeDefinitions {
    fn definition(&self, name: &str) -> Option<&TypeDescriptor>;
}

// ---------------------------------------------------------------------------
// Type relations
// ---------------------------------------------------------------------------

/// Whether `ty` belongs to `anydata`: plain data all the way down.
pub fn is_anydata(ty: &TypeDescriptor, defs: &dyn TypeDefinitions) -> bool {
    conforms(ty, defs, &mut HashSet::new(), ScalarKind::is_data)
}

pub fn is_json(ty: &TypeDescriptor, defs: &dyn TypeDefinitions) -> bool {
    conforms(ty, defs, &mut HashSet::new(), ScalarKind::is_json)
}

fn conforms(
    ty: &TypeDescriptor,
    defs: &dyn TypeDefinitions,
    visiting: &mut HashSet<String>,
    scalar: fn(ScalarKind) -> bool,
) -> bool {
    match ty {
        TypeDescriptor::Scalar(kind) => scalar(*kind),
        TypeDescriptor::Array(element) => conforms(element, defs, visiting, scalar),
        TypeDescriptor::Tuple(members) | TypeDescriptor::Union(members) => members
            .iter()
            .all(|m| conforms(m, defs, visiting, scalar)),
        TypeDescriptor::Record(record) => {
            record
                .fields
                .values()
                .all(|f| conforms(&f.ty, defs, visiting, scalar))
                && record
                    .rest
                    .as_deref()
                    .is_none_or(|rest| conforms(rest, defs, visiting, scalar))
        }
        TypeDescriptor::NamedReference(name) => {
            // Re-entering a definition under inspection adds no new members.
            if !visiting.insert(name.clone()) {
                return true;
            }
            let ok = defs
                .definition(name)
                .is_some_and(|target| conforms(target, defs, visiting, scalar));
            visiting.remove(name);
            ok
        }
        TypeDescriptor::Object(_) | TypeDescriptor::Error => false,
    }
}

/// Structural subtyping over descriptors, nominal for objects.
pub fn is_subtype(sub: &TypeDescriptor, sup: &TypeDescriptor, defs: &dyn TypeDefinitions) -> bool {
    subtype(sub, sup, defs, &mut HashSet::new())
}

fn subtype(
    sub: &TypeDescriptor,
    sup: &TypeDescriptor,
    defs: &dyn TypeDefinitions,
    assumed: &mut HashSet<(String, String)>,
) -> bool {
    use TypeDescriptor as T;

    match (sub, sup) {
        (T::NamedReference(a), T::NamedReference(b)) if a == b => true,
        (T::NamedReference(a), _) => {
            let key = (a.clone(), format!("{sup:?}"));
            if !assumed.insert(key.clone()) {
                return true;
            }
            let ok = defs
                .definition(a)
                .is_some_and(|target| subtype(target, sup, defs, assumed));
            assumed.remove(&key);
            ok
        }
        (T::Union(members), _) => members.iter().all(|m| subtype(m, sup, defs, assumed)),
        (_, T::NamedReference(b)) => defs
            .definition(b)
            .is_some_and(|target| subtype(sub, target, defs, assumed)),
        (_, T::Union(members)) => members.iter().any(|m| subtype(sub, m, defs, assumed)),
        (_, T::Scalar(ScalarKind::Any)) => !matches!(sub, T::Error),
        (_, T::Scalar(ScalarKind::Anydata)) => is_anydata(sub, defs),
        (_, T::Scalar(ScalarKind::Json)) => is_json(sub, defs),
        (T::Scalar(a), T::Scalar(b)) => a == b || (*a == ScalarKind::Byte && *b == ScalarKind::Int),
        (T::Array(a), T::Array(b)) => subtype(a, b, defs, assumed),
        (T::Tuple(members), T::Array(b)) => members.iter().all(|m| subtype(m, b, defs, assumed)),
        (T::Tuple(a), T::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| subtype(x, y, defs, assumed))
        }
        (T::Record(a), T::Record(b)) => record_subtype(a, b, defs, assumed),
        (T::Object(a), T::Object(b)) => a.is_or_includes(b),
        (T::Error, T::Error) => true,
        _ => false,
    }
}

fn record_subtype(
    sub: &RecordType,
    sup: &RecordType,
    defs: &dyn TypeDefinitions,
    assumed: &mut HashSet<(String, String)>,
) -> bool {
    let declared = sup.fields.iter().all(|(name, field)| match sub.fields.get(name) {
        Some(own) => (field.optional || !own.optional) && subtype(&own.ty, &field.ty, defs, assumed),
        None => field.optional,
    });
    if !declared {
        return false;
    }
    match sup.rest.as_deref() {
        // Extra fields of the subtype must fit the supertype's rest type.
        Some(rest) => {
            sub.fields
                .iter()
                .filter(|(name, _)| !sup.fields.contains_key(*name))
                .all(|(_, f)| subtype(&f.ty, rest, defs, assumed))
                && sub
                    .rest
                    .as_deref()
                    .is_none_or(|own| subtype(own, rest, defs, assumed))
        }
        None => sub.rest.is_none() && sub.fields.keys().all(|k| sup.fields.contains_key(k)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Defs(HashMap<String, TypeDescriptor>);

    impl TypeDefinitions for Defs {
        fn definition(&self, name: &str) -> Option<&TypeDescriptor> {
            self.0.get(name)
        }
    }

    fn defs() -> Defs {
        let mut map = HashMap::new();
        map.insert(
            "Address".to_string(),
            TypeDescriptor::closed_record([("city", ScalarKind::String.into())]),
        );
        // type Node record {| Node[] children; |};
        map.insert(
            "Node".to_string(),
            TypeDescriptor::closed_record([(
                "children",
                TypeDescriptor::array_of(TypeDescriptor::named("Node")),
            )]),
        );
        map.insert(
            "Handler".to_string(),
            TypeDescriptor::Object(ObjectType::new(ModuleId::new("acme", "app", "0"), "Handler")),
        );
        Defs(map)
    }

    #[test]
    fn test_anydata_membership() {
        let d = defs();
        assert!(is_anydata(&TypeDescriptor::named("Address"), &d));
        assert!(is_anydata(&TypeDescriptor::named("Node"), &d));
        assert!(is_anydata(&ScalarKind::Byte.into(), &d));
        assert!(!is_anydata(&ScalarKind::Any.into(), &d));
        assert!(!is_anydata(&TypeDescriptor::named("Handler"), &d));
        assert!(!is_anydata(
            &TypeDescriptor::Union(vec![TypeDescriptor::named("Address"), TypeDescriptor::Error]),
            &d
        ));
        assert!(!is_anydata(&TypeDescriptor::named("Missing"), &d));
    }

    #[test]
    fn test_scalar_lattice() {
        let d = defs();
        let byte: TypeDescriptor = ScalarKind::Byte.into();
        assert!(is_subtype(&byte, &ScalarKind::Int.into(), &d));
        assert!(!is_subtype(&ScalarKind::Int.into(), &byte, &d));
        assert!(is_subtype(&ScalarKind::Decimal.into(), &ScalarKind::Json.into(), &d));
        assert!(!is_subtype(&ScalarKind::Anydata.into(), &ScalarKind::Json.into(), &d));
        assert!(!is_subtype(&TypeDescriptor::Error, &ScalarKind::Any.into(), &d));
    }

    #[test]
    fn test_union_and_named_subtyping() {
        let d = defs();
        let address = TypeDescriptor::named("Address");
        let optional = TypeDescriptor::optional(address.clone());
        assert!(is_subtype(&address, &optional, &d));
        assert!(!is_subtype(&optional, &address, &d));
        assert!(is_subtype(
            &TypeDescriptor::closed_record([("city", ScalarKind::String.into())]),
            &address,
            &d
        ));
    }

    #[test]
    fn test_recursive_definition_terminates() {
        let d = defs();
        let node = TypeDescriptor::named("Node");
        assert!(is_subtype(&node, &ScalarKind::Anydata.into(), &d));
        assert!(is_subtype(&TypeDescriptor::array_of(node.clone()), &ScalarKind::Json.into(), &d));
    }

    #[test]
    fn test_object_inclusion_is_nominal() {
        let ollama = ModuleId::new("ballerinax", "ai.ollama", "1");
        let ai = ModuleId::new("ballerina", "ai", "1");
        let base = ObjectType::new(ai, "ModelProvider");
        let provider = ObjectType::new(ollama.clone(), "ModelProvider").including(base.clone());
        let other = ObjectType::new(ollama, "Embedder");
        let d = defs();

        assert!(is_subtype(
            &TypeDescriptor::Object(provider.clone()),
            &TypeDescriptor::Object(base.clone()),
            &d
        ));
        assert!(!is_subtype(
            &TypeDescriptor::Object(base),
            &TypeDescriptor::Object(provider.clone()),
            &d
        ));
        assert!(!is_subtype(
            &TypeDescriptor::Object(other),
            &TypeDescriptor::Object(provider),
            &d
        ));
    }

    #[test]
    fn test_record_width_subtyping() {
        let d = defs();
        let wide = TypeDescriptor::closed_record([
            ("city", ScalarKind::String.into()),
            ("zip", ScalarKind::Int.into()),
        ]);
        let open = TypeDescriptor::Record(RecordType {
            fields: [("city".to_string(), RecordField::required(ScalarKind::String.into()))]
                .into_iter()
                .collect(),
            rest: Some(Box::new(ScalarKind::Anydata.into())),
        });
        assert!(is_subtype(&wide, &open, &d));
        assert!(!is_subtype(&wide, &TypeDescriptor::named("Address"), &d));
    }
}
