use std::{
    borrow::Cow,
    collections::BTreeSet,
    fmt::{self, Write},
    format_args as f,
};

use crate::{
    ast::{BinaryOperator, Expr, ExprKind, Ident, Program, Stmt, StmtKind},
    codegen::{infer, Error, Import, Result},
    types::{Type, TypeEnv},
};

const DEFAULT_CODE_CAPACITY: usize = 4 * 1024; // 4 KiB

/// Precedence of operands that never need to be parenthesized.
const ATOM: u8 = u8::MAX;

pub struct Generator {
    /// Body of the entry point.
    body: String,
    /// Current indentation, in tabs.
    depth: usize,
    imports: BTreeSet<Import>,
    /// Variables declared in each enclosing block, innermost last.
    scopes: Vec<Vec<Declared>>,
}

/// A variable declared in a block, and whether the emitted code reads it.
struct Declared {
    name: Box<str>,
    used: bool,
}

impl Generator {
    pub(super) fn new() -> Generator {
        Generator {
            body: String::with_capacity(DEFAULT_CODE_CAPACITY),
            depth: 1,
            imports: BTreeSet::new(),
            scopes: Vec::new(),
        }
    }

    pub(super) fn generate(mut self, program: &Program) -> Result<String> {
        self.g_scope(TypeEnv::new(), &program.statements)?;

        let mut code = String::with_capacity(self.body.len() + 128);
        code.push_str("package main\n\n");
        if !self.imports.is_empty() {
            code.push_str("import (\n");
            for import in &self.imports {
                code.push_str(&format!("\t\"{import}\"\n"));
            }
            code.push_str(")\n\n");
        }
        code.push_str("func main() {\n");
        code.push_str(&self.body);
        code.push_str("}\n");

        tracing::debug!(bytes = code.len(), imports = ?self.imports, "generated Go source");
        Ok(code)
    }

    /// Generates a block in its own scope. Go rejects variables that are
    /// declared but never read, so each of those gets a blank assignment
    /// before the block closes.
    fn g_scope(&mut self, env: TypeEnv, stmts: &[Stmt]) -> Result<()> {
        self.scopes.push(Vec::new());
        let result = self.g_block(env, stmts);
        let declared = self.scopes.pop().unwrap_or_default();
        result?;

        for Declared { name, used } in declared {
            if !used {
                tracing::trace!(%name, "discarding unread variable");
                self.line(f!("_ = {}", go_ident(&name)));
            }
        }
        Ok(())
    }

    /// Generates each statement in turn, threading the environment through
    /// them.
    fn g_block(&mut self, mut env: TypeEnv, stmts: &[Stmt]) -> Result<()> {
        for stmt in stmts {
            env = self.g_stmt(env, stmt)?;
        }
        Ok(())
    }

    fn g_stmt(&mut self, env: TypeEnv, stmt: &Stmt) -> Result<TypeEnv> {
        match &stmt.kind {
            StmtKind::Print(expr) => {
                let arg = self.g_print_arg(&env, expr)?;
                self.mark_read(expr);
                self.use_import(Import::Fmt);
                self.line(f!("fmt.Println({})", arg.code));
                Ok(env)
            }
            StmtKind::Read(target) => {
                let env = declare(env, target, Type::String)?;
                let name = go_ident(&target.name);
                self.use_import(Import::Fmt);
                self.line(f!("var {name} string"));
                self.line(f!("fmt.Scanln(&{name})"));
                // Passing the address counts as a use.
                self.record(target, true);
                Ok(env)
            }
            StmtKind::Assign { target, value } => {
                let ty = infer(&env, value)?;
                let value_code = g_expr(&env, value)?.code;
                self.mark_read(value);
                let name = go_ident(&target.name);
                match env.get(&target.name) {
                    None => {
                        self.line(f!("{name} := {value_code}"));
                        self.record(target, false);
                        declare(env, target, ty)
                    }
                    Some(declared) if declared == ty => {
                        self.line(f!("{name} = {value_code}"));
                        Ok(env)
                    }
                    Some(declared) => Err(target.pos.wrap(Error::TypeMismatch {
                        name: target.name.clone(),
                        expected: declared,
                        actual: ty,
                    })),
                }
            }
            StmtKind::If {
                condition,
                then_block,
                else_block,
            } => {
                let condition_code = g_expr(&env, condition)?.code;
                self.mark_read(condition);
                self.line(f!("if {condition_code} {{"));
                self.indented(|this| this.g_scope(env.clone(), then_block))?;
                if let Some(else_block) = else_block {
                    self.line(f!("}} else {{"));
                    self.indented(|this| this.g_scope(env.clone(), else_block))?;
                }
                self.line(f!("}}"));
                Ok(env)
            }
            StmtKind::While { condition, body } => {
                let condition_code = g_expr(&env, condition)?.code;
                self.mark_read(condition);
                self.line(f!("for {condition_code} {{"));
                self.indented(|this| this.g_scope(env.clone(), body))?;
                self.line(f!("}}"));
                Ok(env)
            }
            StmtKind::For {
                binder,
                start,
                end,
                body,
            } => {
                let start_code = g_expr(&env, start)?.code;
                let end_code = g_expr(&env, end)?.code;
                self.mark_read(start);
                self.mark_read(end);
                let body_env = declare(env.clone(), binder, Type::Int)?;
                let name = go_ident(&binder.name);
                self.line(f!(
                    "for {name} := {start_code}; {name} <= {end_code}; {name}++ {{"
                ));
                self.indented(|this| this.g_scope(body_env, body))?;
                self.line(f!("}}"));
                Ok(env)
            }
            StmtKind::Expr(expr) => {
                let ty = infer(&env, expr)?;
                tracing::trace!(pos = %stmt.pos, %ty, "discarding expression statement");
                Ok(env)
            }
        }
    }

    /// Renders the argument of a print statement as a Go string.
    ///
    /// Integer and boolean operands of a concatenation are converted as a
    /// whole, so arithmetic inside them keeps its meaning.
    fn g_print_arg(&mut self, env: &TypeEnv, expr: &Expr) -> Result<Rendered> {
        match infer(env, expr)? {
            Type::String => match &expr.kind {
                ExprKind::Binary {
                    op: op @ BinaryOperator::Add,
                    lhs,
                    rhs,
                } => {
                    let lhs = self.g_print_arg(env, lhs)?;
                    let rhs = self.g_print_arg(env, rhs)?;
                    Ok(Rendered::binary(*op, lhs, rhs))
                }
                _ => g_expr(env, expr),
            },
            Type::Int => {
                let inner = g_expr(env, expr)?;
                self.use_import(Import::Strconv);
                Ok(Rendered::call("strconv.Itoa", &inner))
            }
            Type::Bool => {
                let inner = g_expr(env, expr)?;
                self.use_import(Import::Strconv);
                Ok(Rendered::call("strconv.FormatBool", &inner))
            }
        }
    }

    /// Records a declaration in the innermost scope.
    fn record(&mut self, ident: &Ident, used: bool) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(Declared {
                name: ident.name.clone(),
                used,
            });
        }
    }

    /// Marks every variable `expr` reads as used. Visible names are unique
    /// across the enclosing scopes, so the first match is the declaration.
    fn mark_read(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Id(name) => {
                let declared = self
                    .scopes
                    .iter_mut()
                    .rev()
                    .flat_map(|scope| scope.iter_mut())
                    .find(|declared| declared.name == *name);
                if let Some(declared) = declared {
                    declared.used = true;
                }
            }
            ExprKind::Binary { lhs, rhs, .. } => {
                self.mark_read(lhs);
                self.mark_read(rhs);
            }
            ExprKind::Int(_) | ExprKind::String(_) => (),
        }
    }
}

/// Renders `expr` as a Go expression of its own type.
fn g_expr(env: &TypeEnv, expr: &Expr) -> Result<Rendered> {
    match &expr.kind {
        ExprKind::String(raw) => Ok(Rendered::atom(quote(raw))),
        ExprKind::Int(value) => Ok(Rendered::atom(value.to_string())),
        ExprKind::Id(name) => {
            infer(env, expr)?;
            Ok(Rendered::atom(go_ident(name).into_owned()))
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let lhs = g_expr(env, lhs)?;
            let rhs = g_expr(env, rhs)?;
            Ok(Rendered::binary(*op, lhs, rhs))
        }
    }
}

fn declare(env: TypeEnv, ident: &Ident, ty: Type) -> Result<TypeEnv> {
    if env.contains(&ident.name) {
        return Err(ident.pos.wrap(Error::Redeclared(ident.name.clone())));
    }
    tracing::trace!(name = %ident, %ty, "declared");
    Ok(env.bind(&ident.name, ty))
}

/// Maps a Malang identifier to a Go identifier that cannot clash with a Go
/// keyword, the blank identifier, or a name the generated code refers to.
///
/// Such names get a trailing underscore. So do names that already end in
/// one, which keeps the mapping injective (`fmt` is `fmt_`, `fmt_` is
/// `fmt__`).
fn go_ident(name: &str) -> Cow<'_, str> {
    let reserved = matches!(
        name,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
            // Referred to by the generated code.
            | "fmt"
            | "strconv"
            | "string"
    );
    if reserved || name.ends_with('_') {
        Cow::Owned(format!("{name}_"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Quotes a raw string literal body as a Go interpreted string literal which
/// evaluates to exactly that body.
fn quote(raw: &str) -> String {
    let mut buf = String::with_capacity(raw.len() + 2);
    buf.push('"');
    for c in raw.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if c.is_control() => {
                write!(buf, "\\u{:04x}", u32::from(c)).expect("write to string is infallible");
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
    buf
}

/// A Go expression, along with the precedence of its outermost operator.
struct Rendered {
    code: String,
    prec: u8,
}

impl Rendered {
    fn atom(code: String) -> Rendered {
        Rendered { code, prec: ATOM }
    }

    fn call(function: &str, arg: &Rendered) -> Rendered {
        Rendered::atom(format!("{function}({})", arg.code))
    }

    fn binary(op: BinaryOperator, lhs: Rendered, rhs: Rendered) -> Rendered {
        let prec = op.precedence();
        Rendered {
            code: format!("{} {op} {}", lhs.grouped(prec), rhs.grouped(prec)),
            prec,
        }
    }

    /// Parenthesizes the operand of an operator of precedence `parent` when
    /// it binds less tightly or equally. The equal case is redundant on the
    /// left side, but keeps the grouping of the source explicit.
    fn grouped(self, parent: u8) -> String {
        if self.prec <= parent {
            format!("({})", self.code)
        } else {
            self.code
        }
    }
}

// Utility functions.
impl Generator {
    fn line(&mut self, f: fmt::Arguments<'_>) {
        for _ in 0..self.depth {
            self.body.push('\t');
        }
        self.body
            .write_fmt(f)
            .expect("code emit should be infallible");
        self.body.push('\n');
    }

    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn use_import(&mut self, import: Import) {
        self.imports.insert(import);
    }
}

#[cfg(test)]
mod tests {
    use super::{go_ident, quote};

    #[test]
    fn test_quote() {
        assert_eq!(quote(""), r#""""#);
        assert_eq!(quote("plain text"), r#""plain text""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quote(r"C:\dir"), r#""C:\\dir""#);
        assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(quote("two\nlines\ttab"), r#""two\nlines\ttab""#);
        assert_eq!(quote("bell\u{7}"), r#""bell\u0007""#);
        assert_eq!(quote("ñandú ☃"), "\"ñandú ☃\"");
    }

    #[test]
    fn test_go_ident() {
        for (name, mapped) in [
            ("x", "x"),
            ("total_sum", "total_sum"),
            ("Func", "Func"),
            ("func", "func_"),
            ("range", "range_"),
            ("type", "type_"),
            ("fmt", "fmt_"),
            ("strconv", "strconv_"),
            ("string", "string_"),
            ("_", "__"),
            ("fmt_", "fmt__"),
            ("x_", "x__"),
        ] {
            assert_eq!(go_ident(name), mapped, "mapping {name:?}");
        }
    }
}
