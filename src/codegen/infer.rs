use crate::{
    ast::{BinaryOperator, Expr, ExprKind},
    codegen::{Error, Result},
    types::{Type, TypeEnv},
};

/// Infers the type of `expr` under `env`.
///
/// `+` is a concatenation when either side is a string, and an addition
/// otherwise. Comparisons are boolean; every other operator is arithmetic.
/// Operand types are otherwise not checked.
pub fn infer(env: &TypeEnv, expr: &Expr) -> Result<Type> {
    match &expr.kind {
        ExprKind::String(_) => Ok(Type::String),
        ExprKind::Int(_) => Ok(Type::Int),
        ExprKind::Id(name) => env
            .get(name)
            .ok_or_else(|| expr.pos.wrap(Error::Undeclared(name.clone()))),
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = infer(env, lhs)?;
            let rhs = infer(env, rhs)?;
            let ty = match op {
                BinaryOperator::Add if lhs == Type::String || rhs == Type::String => Type::String,
                op if op.is_comparison() => Type::Bool,
                _ => Type::Int,
            };
            Ok(ty)
        }
    }
}
