// program ::= stmt*
// stmt ::= parayu '(' expr ')'
//        | kelk '(' ID ')'
//        | ID '=' expr
//        | ith_sheriyano '(' expr ')' enkil '{' stmt* '}' [alle '{' stmt* '}']
//        | ellam_sheriyano '(' expr ')' enkil '{' stmt* '}'
//        | oron_ayi ID edukk '(' expr '..' expr ')' '{' stmt* '}'
//        | expr
// expr ::= expr ('==' | '!=' | '<' | '<=' | '>' | '>=') expr
//        | expr ('+' | '-') expr
//        | expr ('*' | '/') expr
//        | '(' expr ')'
//        | ID
//        | integer
//        | string

// Precedence
//
// * /
// + -
// == != < <= > >=

use std::fmt;

use crate::token::{Pos, TokenKind};

#[derive(Debug, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

#[derive(Debug, PartialEq)]
pub enum StmtKind {
    Print(Expr),
    Read(Ident),
    /// Declares `target` on its first assignment in scope, reassigns it
    /// otherwise. The distinction is made during code generation.
    Assign {
        target: Ident,
        value: Expr,
    },
    If {
        condition: Expr,
        then_block: Vec<Stmt>,
        else_block: Option<Vec<Stmt>>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    /// Counts from `start` to `end`, both inclusive.
    For {
        binder: Ident,
        start: Expr,
        end: Expr,
        body: Vec<Stmt>,
    },
    /// A bare expression. Checked, but produces no code.
    Expr(Expr),
}

#[derive(Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Id(Box<str>),
    Int(i64),
    /// The raw body of the literal; escapes are not interpreted.
    String(Box<str>),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOperator {
    #[cfg(test)]
    const ALL: &'static [BinaryOperator] = &[
        BinaryOperator::Add,
        BinaryOperator::Sub,
        BinaryOperator::Mul,
        BinaryOperator::Div,
        BinaryOperator::Eq,
        BinaryOperator::Ne,
        BinaryOperator::Lt,
        BinaryOperator::Le,
        BinaryOperator::Gt,
        BinaryOperator::Ge,
    ];

    pub fn from_token(kind: TokenKind) -> Option<BinaryOperator> {
        let op = match kind {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            TokenKind::EqEq => BinaryOperator::Eq,
            TokenKind::NotEq => BinaryOperator::Ne,
            TokenKind::Less => BinaryOperator::Lt,
            TokenKind::LessEq => BinaryOperator::Le,
            TokenKind::Greater => BinaryOperator::Gt,
            TokenKind::GreaterEq => BinaryOperator::Ge,
            _ => return None,
        };
        Some(op)
    }

    /// Binding strength; higher binds tighter. Zero is reserved for "no
    /// enclosing operator".
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Mul | BinaryOperator::Div => 3,
            BinaryOperator::Add | BinaryOperator::Sub => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Le
            | BinaryOperator::Gt
            | BinaryOperator::Ge => 1,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 1
    }

    /// The operator's spelling, which is the same in the source and in Go.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Eq => "==",
            BinaryOperator::Ne => "!=",
            BinaryOperator::Lt => "<",
            BinaryOperator::Le => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::Ge => ">=",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Box<str>,
    pub pos: Pos,
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
