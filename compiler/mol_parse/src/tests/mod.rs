//! Parser tests.
//!
//! - `expr`: precedence, postfix access, pipes, lambdas, `match`, f-strings
//! - `stmt`: statements, blocks and `end` tracking
//! - `errors`: error codes and spans for malformed input
//!
//! Expressions are compared through a compact S-expression rendering so that
//! precedence tests read like the grouping they check.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]

mod errors;

use std::fmt::Write;

use mol_ir::ast::{Expr, ExprKind, FStringPart, FunctionBody, Pattern, PatternKind, Program, StmtKind};
use mol_ir::StringInterner;

use crate::{parse_source, SyntaxError};

fn parse_ok(source: &str) -> (Program, StringInterner) {
    let interner = StringInterner::new();
    let program = match parse_source(source, &interner) {
        Ok(program) => program,
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    };
    (program, interner)
}

fn parse_err(source: &str) -> SyntaxError {
    let interner = StringInterner::new();
    match parse_source(source, &interner) {
        Ok(program) => panic!("expected an error for {source:?}, got {program:?}"),
        Err(e) => e,
    }
}

/// Parse a program consisting of one expression statement and render it.
fn expr(source: &str) -> String {
    let (program, interner) = parse_ok(source);
    assert_eq!(program.statements.len(), 1, "expected one statement");
    match &program.statements[0].kind {
        StmtKind::Expr(e) => sexpr(e, &interner),
        other => panic!("expected an expression statement, got {other:?}"),
    }
}

fn sexpr(expr: &Expr, interner: &StringInterner) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, interner);
    out
}

fn write_list(out: &mut String, items: &[Expr], interner: &StringInterner) {
    for item in items {
        out.push(' ');
        write_expr(out, item, interner);
    }
}

fn write_expr(out: &mut String, expr: &Expr, interner: &StringInterner) {
    match &expr.kind {
        ExprKind::Number(n) => write!(out, "{n}").unwrap(),
        ExprKind::Text(s) => write!(out, "{s:?}").unwrap(),
        ExprKind::Bool(b) => write!(out, "{b}").unwrap(),
        ExprKind::Null => out.push_str("null"),
        ExprKind::FString(parts) => {
            out.push_str("(f");
            for part in parts {
                out.push(' ');
                match part {
                    FStringPart::Literal(s) => write!(out, "{s:?}").unwrap(),
                    FStringPart::Expr(e) => write_expr(out, e, interner),
                }
            }
            out.push(')');
        }
        ExprKind::List(items) => {
            out.push_str("(list");
            write_list(out, items, interner);
            out.push(')');
        }
        ExprKind::Map(entries) => {
            out.push_str("(map");
            for (key, value) in entries {
                write!(out, " {key}:").unwrap();
                write_expr(out, value, interner);
            }
            out.push(')');
        }
        ExprKind::Var(name) => out.push_str(interner.lookup(*name)),
        ExprKind::Binary { op, left, right } => {
            write!(out, "({op} ").unwrap();
            write_expr(out, left, interner);
            out.push(' ');
            write_expr(out, right, interner);
            out.push(')');
        }
        ExprKind::Unary { op, operand } => {
            write!(out, "({} ", op.as_symbol()).unwrap();
            write_expr(out, operand, interner);
            out.push(')');
        }
        ExprKind::Call { callee, args } => {
            out.push_str("(call ");
            write_expr(out, callee, interner);
            write_list(out, args, interner);
            out.push(')');
        }
        ExprKind::MethodCall {
            receiver,
            method,
            args,
        } => {
            write!(out, "(.{} ", interner.lookup(*method)).unwrap();
            write_expr(out, receiver, interner);
            write_list(out, args, interner);
            out.push(')');
        }
        ExprKind::Field { receiver, field } => {
            out.push_str("(field ");
            write_expr(out, receiver, interner);
            write!(out, " {})", interner.lookup(*field)).unwrap();
        }
        ExprKind::Index { receiver, index } => {
            out.push_str("(index ");
            write_expr(out, receiver, interner);
            out.push(' ');
            write_expr(out, index, interner);
            out.push(')');
        }
        ExprKind::Pipe { seed, stages } => {
            out.push_str("(|> ");
            write_expr(out, seed, interner);
            write_list(out, stages, interner);
            out.push(')');
        }
        ExprKind::Lambda(decl) => {
            out.push_str("(fn (");
            let names: Vec<_> = decl.params.iter().map(|p| interner.lookup(p.name)).collect();
            out.push_str(&names.join(" "));
            out.push_str(") ");
            match &decl.body {
                FunctionBody::Expr(e) => write_expr(out, e, interner),
                FunctionBody::Block(_) => out.push_str("<block>"),
            }
            out.push(')');
        }
        ExprKind::Match { subject, arms } => {
            out.push_str("(match ");
            write_expr(out, subject, interner);
            for arm in arms {
                out.push_str(" [");
                write_pattern(out, &arm.pattern, interner);
                if let Some(guard) = &arm.guard {
                    out.push_str(" when ");
                    write_expr(out, guard, interner);
                }
                write!(out, " -> {} stmts]", arm.body.len()).unwrap();
            }
            out.push(')');
        }
    }
}

fn write_pattern(out: &mut String, pattern: &Pattern, interner: &StringInterner) {
    match &pattern.kind {
        PatternKind::Wildcard => out.push('_'),
        PatternKind::Number(n) => write!(out, "{n}").unwrap(),
        PatternKind::Text(s) => write!(out, "{s:?}").unwrap(),
        PatternKind::Bool(b) => write!(out, "{b}").unwrap(),
        PatternKind::Null => out.push_str("null"),
        PatternKind::Binding(name) => out.push_str(interner.lookup(*name)),
        PatternKind::List { items, rest } => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_pattern(out, item, interner);
            }
            if let Some(rest) = rest {
                if !items.is_empty() {
                    out.push_str(", ");
                }
                write!(out, "...{}", interner.lookup(*rest)).unwrap();
            }
            out.push(']');
        }
    }
}
