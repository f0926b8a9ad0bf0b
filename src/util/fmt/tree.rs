use std::io::Write;

use crate::ast::*;

const INDENT_WIDTH: usize = 2;

pub fn print_program_string(program: &Program) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_program(&mut buf, program).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_expr_string(expr: &Expr) -> String {
    let mut buf = Vec::with_capacity(512);
    print_expr(&mut buf, 0, expr).unwrap();
    String::from_utf8(buf).unwrap()
}

pub fn print_program(w: &mut impl Write, program: &Program) -> std::io::Result<()> {
    print_block(w, 0, &program.statements)
}

fn print_block(w: &mut impl Write, i: usize, stmts: &[Stmt]) -> std::io::Result<()> {
    for stmt in stmts {
        print_stmt(w, i, stmt)?;
    }
    Ok(())
}

fn print_stmt(w: &mut impl Write, i: usize, stmt: &Stmt) -> std::io::Result<()> {
    sp(w, i)?;
    let pos = stmt.pos;
    match &stmt.kind {
        StmtKind::Print(expr) => {
            writeln!(w, "print ({pos})")?;
            print_expr(w, i + 1, expr)?;
        }
        StmtKind::Read(target) => {
            writeln!(w, "read {target} ({pos})")?;
        }
        StmtKind::Assign { target, value } => {
            writeln!(w, "assign {target} ({pos})")?;
            print_expr(w, i + 1, value)?;
        }
        StmtKind::If {
            condition,
            then_block,
            else_block,
        } => {
            writeln!(w, "if ({pos})")?;
            print_expr(w, i + 1, condition)?;
            label(w, i + 1, "then")?;
            print_block(w, i + 2, then_block)?;
            if let Some(else_block) = else_block {
                label(w, i + 1, "else")?;
                print_block(w, i + 2, else_block)?;
            }
        }
        StmtKind::While { condition, body } => {
            writeln!(w, "while ({pos})")?;
            print_expr(w, i + 1, condition)?;
            label(w, i + 1, "do")?;
            print_block(w, i + 2, body)?;
        }
        StmtKind::For {
            binder,
            start,
            end,
            body,
        } => {
            writeln!(w, "for {binder} ({pos})")?;
            print_expr(w, i + 1, start)?;
            print_expr(w, i + 1, end)?;
            label(w, i + 1, "do")?;
            print_block(w, i + 2, body)?;
        }
        StmtKind::Expr(expr) => {
            writeln!(w, "expr ({pos})")?;
            print_expr(w, i + 1, expr)?;
        }
    }
    Ok(())
}

pub fn print_expr(w: &mut impl Write, i: usize, expr: &Expr) -> std::io::Result<()> {
    sp(w, i)?;
    let pos = expr.pos;
    match &expr.kind {
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op} ({pos})")?;
            print_expr(w, i + 1, lhs)?;
            print_expr(w, i + 1, rhs)?;
        }
        ExprKind::Id(name) => {
            writeln!(w, "ident {name} ({pos})")?;
        }
        ExprKind::Int(val) => {
            writeln!(w, "int {val} ({pos})")?;
        }
        ExprKind::String(val) => {
            writeln!(w, "string {val:?} ({pos})")?;
        }
    }
    Ok(())
}

fn label(w: &mut impl Write, i: usize, text: &str) -> std::io::Result<()> {
    sp(w, i)?;
    writeln!(w, "{text}")
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}
