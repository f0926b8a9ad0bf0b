//! Compiler for Malang, a small imperative language with Malayalam keywords,
//! targeting Go source code.
//!
//! The pipeline is [`lexer`] → [`parser`] → [`codegen`], each stage failing
//! fast with an error positioned in the source. [`compile`] runs all of them.

/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The code generator takes an AST, infers the type of each identifier, and
/// maps it into an equivalent Go program.
pub mod codegen;

pub mod ast;
pub mod token;
pub mod types;

pub mod util {
    pub mod fmt {
        pub mod tree;
    }
    #[cfg(test)]
    pub(crate) mod test_utils;
}

use token::Spanned;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] Spanned<lexer::Error>),
    #[error(transparent)]
    Parse(#[from] Spanned<parser::Error>),
    #[error(transparent)]
    Codegen(#[from] Spanned<codegen::Error>),
}

/// Compiles a Malang program into the source of a Go `main` package.
pub fn compile(src: &str) -> Result<String, Error> {
    let tokens = lexer::lex_in_new(src)?;
    let program = parser::parse_program(&tokens)?;
    let code = codegen::generate(&program)?;
    Ok(code)
}
