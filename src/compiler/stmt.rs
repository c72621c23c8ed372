use std::collections::HashSet;

use crate::type_checker::typed_ast::{TypedElseBranch, TypedIfStmt, TypedStmt, TypedStmtKind};

use super::{compiler::Compiler, expr::gen_expression};

pub fn gen_body(compiler: &mut Compiler, stmts: &[TypedStmt], locals: &HashSet<String>) -> String {
    stmts
        .iter()
        .map(|stmt| gen_statement(compiler, stmt, locals))
        .collect()
}

pub fn gen_statement(compiler: &mut Compiler, stmt: &TypedStmt, locals: &HashSet<String>) -> String {
    match &stmt.kind {
        TypedStmtKind::Assign { name, value } => {
            let value_code = gen_expression(value, locals);
            let scope = if locals.contains(name) {
                "local"
            } else {
                "global"
            };
            format!("{}({}.set ${})", value_code, scope, name)
        }

        TypedStmtKind::Pass => String::new(),

        TypedStmtKind::Return { value } => {
            // A bare return yields the scratch slot, preserving the last
            // statement-expression value as the implicit result.
            let ret_value_code = match value {
                Some(expr) => gen_expression(expr, locals),
                None => String::from("(local.get $scratch)"),
            };
            format!("{}(return)", ret_value_code)
        }

        TypedStmtKind::Expr { expr } => {
            gen_expression(expr, locals) + "(local.set $scratch)"
        }

        TypedStmtKind::If(if_stmt) => gen_if_statement(compiler, if_stmt, locals),

        TypedStmtKind::While { condition, body } => {
            let label = compiler.next_label();
            let condition_code = gen_expression(condition, locals);
            let body_code = gen_body(compiler, body, locals);

            // Pre-test loop: invert the condition and branch out of the
            // block when it is false, otherwise run the body and jump back
            // to the loop head.
            format!(
                "(block $block_{label} (loop $loop_{label} {condition_code}(i32.const 1)(i32.xor)(br_if $block_{label}) {body_code}(br $loop_{label})))"
            )
        }
    }
}

fn gen_if_statement(
    compiler: &mut Compiler,
    if_stmt: &TypedIfStmt,
    locals: &HashSet<String>,
) -> String {
    let condition_code = gen_expression(&if_stmt.condition, locals);
    let body_code = gen_body(compiler, &if_stmt.body, locals);

    let else_code = match &if_stmt.else_branch {
        None => String::new(),
        Some(TypedElseBranch::Elif(inner)) => {
            format!("(else {})", gen_if_statement(compiler, inner, locals))
        }
        Some(TypedElseBranch::Else(stmts)) => {
            format!("(else {})", gen_body(compiler, stmts, locals))
        }
    };

    format!("{}(if (then {}) {})", condition_code, body_code, else_code)
}
