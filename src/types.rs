use std::{collections::HashMap, fmt};

/// The semantic type of a value, as inferred by the code generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    String,
    Int,
    Bool,
}

impl Type {
    /// The name of the type in Go.
    pub const fn go_name(self) -> &'static str {
        match self {
            Type::String => "string",
            Type::Int => "int",
            Type::Bool => "bool",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_name())
    }
}

/// Maps the identifiers visible in a scope to their types.
///
/// Environments are values: entering a block clones the environment, so
/// anything declared inside the block is dropped with it. Declaring returns
/// the extended environment rather than mutating a shared one.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    map: HashMap<Box<str>, Type>,
}

impl TypeEnv {
    pub fn new() -> TypeEnv {
        TypeEnv::default()
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Returns this environment extended with `name: ty`.
    ///
    /// Callers check for redeclaration beforehand; binding an existing name
    /// replaces its type.
    #[must_use]
    pub fn bind(mut self, name: &str, ty: Type) -> TypeEnv {
        self.map.insert(name.into(), ty);
        self
    }
}
