//! Go code generation.
//!
//! The generator walks the program once, threading a [`TypeEnv`] through the
//! statements. Along the way it records which Go packages the emitted code
//! refers to, so the import block always matches the body exactly.
//!
//! [`TypeEnv`]: crate::types::TypeEnv

use std::fmt;

use crate::{ast::Program, token::Spanned, types::Type};

mod go;
mod infer;
#[cfg(test)]
mod tests;

pub use infer::infer;

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Generates a Go `main` package equivalent to `program`.
pub fn generate(program: &Program) -> Result<String> {
    go::Generator::new().generate(program)
}

/// A Go standard library package the generated code may depend on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Import {
    /// Line-oriented printing and scanning.
    Fmt,
    /// Integer and boolean to string conversions.
    Strconv,
}

impl Import {
    pub const fn path(self) -> &'static str {
        match self {
            Import::Fmt => "fmt",
            Import::Strconv => "strconv",
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("'{0}' is already declared")]
    Redeclared(Box<str>),
    #[error("'{0}' is not declared")]
    Undeclared(Box<str>),
    #[error("cannot assign {actual} to '{name}' of type {expected}")]
    TypeMismatch {
        name: Box<str>,
        expected: Type,
        actual: Type,
    },
}
