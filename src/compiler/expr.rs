use std::collections::HashSet;

use crate::ast::{
    expressions::{BinOp, UnaOp},
    types::Type,
};
use crate::type_checker::typed_ast::{TypedExpr, TypedExprKind};

/// The WAT instruction implementing each binary operator on signed i32
/// operands. `is` only ever sees two none values, so it lowers to `eq`.
fn binop_instruction(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "add",
        BinOp::Sub => "sub",
        BinOp::Mul => "mul",
        BinOp::FloorDiv => "div_s",
        BinOp::Mod => "rem_s",
        BinOp::Eq => "eq",
        BinOp::NotEq => "ne",
        BinOp::GreaterEq => "ge_s",
        BinOp::LessEq => "le_s",
        BinOp::Greater => "gt_s",
        BinOp::Less => "lt_s",
        BinOp::Is => "eq",
    }
}

/// The type-tag constant the print runtime uses to format its argument.
fn print_type_tag(ty: Type) -> u32 {
    match ty {
        Type::Int => 0,
        Type::Bool => 1,
        _ => 2,
    }
}

pub fn gen_expression(expr: &TypedExpr, locals: &HashSet<String>) -> String {
    match &expr.kind {
        TypedExprKind::Literal { value } => {
            format!("(i32.const {})", value.encoded_value())
        }
        TypedExprKind::Identifier { name } => {
            let scope = if locals.contains(name) {
                "local"
            } else {
                "global"
            };
            format!("({}.get ${})", scope, name)
        }
        TypedExprKind::Unary { op, operand } => {
            let operand_code = gen_expression(operand, locals);
            match op {
                // 0 - x, there is no i32 negate instruction
                UnaOp::Negate => format!("(i32.const 0){}(i32.sub)", operand_code),
                UnaOp::Not => format!("{}(i32.const 1)(i32.xor)", operand_code),
            }
        }
        TypedExprKind::Binary { op, left, right } => {
            let left_code = gen_expression(left, locals);
            let right_code = gen_expression(right, locals);
            format!("{}{}(i32.{})", left_code, right_code, binop_instruction(*op))
        }
        TypedExprKind::Grouping { inner } => gen_expression(inner, locals),
        TypedExprKind::Call { name, args } => {
            let mut args_code: String = args
                .iter()
                .map(|arg| gen_expression(arg, locals))
                .collect();

            // print gets a trailing tag constant describing its argument's
            // static type, pushed after the argument and before the call.
            if name == "print" {
                args_code += &format!("(i32.const {})", print_type_tag(args[0].ty));
            }

            format!("{}(call ${})", args_code, name)
        }
    }
}
