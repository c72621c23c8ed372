use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Literal, Program},
        expressions::{Expr, UnaOp},
        statements::{ElseBranch, FuncDef, IfStmt, Stmt, VarDef},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::typed_ast::{
    TypedElseBranch, TypedExpr, TypedExprKind, TypedFuncBody, TypedFuncDef, TypedIfStmt,
    TypedProgram, TypedStmt, TypedStmtKind, TypedVarDef,
};

/// A function signature as seen by call checking. Built-ins and user
/// functions share this shape and live in the same table.
#[derive(Debug, Clone)]
pub struct FuncSig {
    pub params: Vec<Type>,
    pub return_type: Type,
}

/// One lexical scope frame: variable name to declared type.
#[derive(Debug, Default)]
struct Scope {
    vars: HashMap<String, Type>,
}

/// The checking environment: an ordered list of scope frames (outermost
/// first, innermost last) plus the program-wide function table and the
/// declared return type of the function currently being checked.
///
/// The frame list always starts with the global frame. While a function body
/// is being checked exactly one local frame sits on top of it; the
/// resolution algorithm does not depend on that and just walks frames
/// innermost-first.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
    funcs: HashMap<String, FuncSig>,
    return_type: Option<Type>,
}

fn builtin_functions() -> HashMap<String, FuncSig> {
    let mut builtins = HashMap::new();
    builtins.insert(
        String::from("print"),
        FuncSig {
            params: vec![Type::Any],
            return_type: Type::None,
        },
    );
    builtins.insert(
        String::from("abs"),
        FuncSig {
            params: vec![Type::Int],
            return_type: Type::Int,
        },
    );
    builtins.insert(
        String::from("max"),
        FuncSig {
            params: vec![Type::Int, Type::Int],
            return_type: Type::Int,
        },
    );
    builtins.insert(
        String::from("min"),
        FuncSig {
            params: vec![Type::Int, Type::Int],
            return_type: Type::Int,
        },
    );
    builtins.insert(
        String::from("pow"),
        FuncSig {
            params: vec![Type::Int, Type::Int],
            return_type: Type::Int,
        },
    );
    builtins
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv {
            scopes: vec![Scope::default()],
            funcs: builtin_functions(),
            return_type: None,
        }
    }

    fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    fn in_function(&self) -> bool {
        self.scopes.len() > 1
    }

    /// Resolves a variable for reading: innermost frame first, falling
    /// through to the global frame.
    fn lookup_var(&self, name: &str) -> Option<Type> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.vars.get(name).copied())
    }

    /// Resolves a variable in the innermost frame only. Assignment targets
    /// inside a function must be declared in that function.
    fn lookup_innermost(&self, name: &str) -> Option<Type> {
        self.scopes.last().unwrap().vars.get(name).copied()
    }

    /// Declares a variable in the innermost frame. At top level the name
    /// must be free among both global variables and functions; inside a
    /// function it must only be free locally.
    fn declare_var(&mut self, name: &str, ty: Type, position: Position) -> Result<(), Error> {
        let duplicate = if self.in_function() {
            self.lookup_innermost(name).is_some()
        } else {
            self.lookup_innermost(name).is_some() || self.funcs.contains_key(name)
        };

        if duplicate {
            return Err(Error::new(
                ErrorImpl::DuplicateDeclaration {
                    name: name.to_string(),
                },
                position,
            ));
        }

        self.scopes
            .last_mut()
            .unwrap()
            .vars
            .insert(name.to_string(), ty);
        Ok(())
    }

    /// Declares a function signature. The table is pre-populated with the
    /// built-ins, so shadowing a built-in fails the same way as any other
    /// duplicate. A global variable of the same name also conflicts.
    fn declare_func(&mut self, name: &str, sig: FuncSig, position: Position) -> Result<(), Error> {
        if self.funcs.contains_key(name) || self.scopes[0].vars.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateDeclaration {
                    name: name.to_string(),
                },
                position,
            ));
        }

        self.funcs.insert(name.to_string(), sig);
        Ok(())
    }

    fn lookup_func(&self, name: &str) -> Option<&FuncSig> {
        self.funcs.get(name)
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        TypeEnv::new()
    }
}

pub fn type_check_literal(literal: &Literal) -> Type {
    match literal {
        Literal::Number(_) => Type::Int,
        Literal::Boolean(_) => Type::Bool,
        Literal::None => Type::None,
    }
}

pub fn type_check_expr(env: &TypeEnv, expr: &Expr) -> Result<TypedExpr, Error> {
    match expr {
        Expr::Literal { value, .. } => Ok(TypedExpr {
            kind: TypedExprKind::Literal { value: *value },
            ty: type_check_literal(value),
        }),
        Expr::Identifier { name, span } => match env.lookup_var(name) {
            Some(ty) => Ok(TypedExpr {
                kind: TypedExprKind::Identifier { name: name.clone() },
                ty,
            }),
            None => Err(Error::new(
                ErrorImpl::NotAVariable { name: name.clone() },
                span.start.clone(),
            )),
        },
        Expr::Unary { op, operand, span } => {
            let typed_operand = type_check_expr(env, operand)?;
            let expected = match op {
                UnaOp::Negate => Type::Int,
                UnaOp::Not => Type::Bool,
            };
            if typed_operand.ty != expected {
                return Err(Error::new(
                    ErrorImpl::UnaryOperandType {
                        op: op.to_string(),
                        operand: typed_operand.ty.to_string(),
                    },
                    span.start.clone(),
                ));
            }
            Ok(TypedExpr {
                ty: expected,
                kind: TypedExprKind::Unary {
                    op: *op,
                    operand: Box::new(typed_operand),
                },
            })
        }
        Expr::Binary {
            op,
            left,
            right,
            span,
        } => {
            let typed_left = type_check_expr(env, left)?;
            let typed_right = type_check_expr(env, right)?;

            let operand_error = || {
                Err(Error::new(
                    ErrorImpl::BinaryOperandTypes {
                        op: op.to_string(),
                        left: typed_left.ty.to_string(),
                        right: typed_right.ty.to_string(),
                    },
                    span.start.clone(),
                ))
            };

            let ty = if op.is_arithmetic() {
                if typed_left.ty != Type::Int || typed_right.ty != Type::Int {
                    return operand_error();
                }
                Type::Int
            } else if op.is_relational() {
                if typed_left.ty != Type::Int || typed_right.ty != Type::Int {
                    return operand_error();
                }
                Type::Bool
            } else if op.is_equality() {
                // Value equality covers int and bool; comparing none values
                // is reserved for `is`.
                if typed_left.ty == Type::None
                    || typed_right.ty == Type::None
                    || typed_left.ty != typed_right.ty
                {
                    return operand_error();
                }
                Type::Bool
            } else {
                // `is` is the none-identity test only.
                if typed_left.ty != Type::None || typed_right.ty != Type::None {
                    return operand_error();
                }
                Type::Bool
            };

            Ok(TypedExpr {
                ty,
                kind: TypedExprKind::Binary {
                    op: *op,
                    left: Box::new(typed_left),
                    right: Box::new(typed_right),
                },
            })
        }
        Expr::Grouping { inner, .. } => {
            let typed_inner = type_check_expr(env, inner)?;
            Ok(TypedExpr {
                ty: typed_inner.ty,
                kind: TypedExprKind::Grouping {
                    inner: Box::new(typed_inner),
                },
            })
        }
        Expr::Call { name, args, span } => {
            let sig = match env.lookup_func(name) {
                Some(sig) => sig.clone(),
                None => {
                    return Err(Error::new(
                        ErrorImpl::NotAFunction { name: name.clone() },
                        span.start.clone(),
                    ))
                }
            };

            if sig.params.len() != args.len() {
                return Err(Error::new(
                    ErrorImpl::ArityMismatch {
                        expected: sig.params.len(),
                        received: args.len(),
                    },
                    span.start.clone(),
                ));
            }

            let mut typed_args = Vec::new();
            for (index, (arg, param)) in args.iter().zip(sig.params.iter()).enumerate() {
                let typed_arg = type_check_expr(env, arg)?;
                if *param != Type::Any && typed_arg.ty != *param {
                    return Err(Error::new(
                        ErrorImpl::ArgumentTypeMismatch {
                            index,
                            expected: param.to_string(),
                            received: typed_arg.ty.to_string(),
                        },
                        arg.span().start.clone(),
                    ));
                }
                typed_args.push(typed_arg);
            }

            Ok(TypedExpr {
                ty: sig.return_type,
                kind: TypedExprKind::Call {
                    name: name.clone(),
                    args: typed_args,
                },
            })
        }
    }
}

pub fn type_check_stmt(env: &mut TypeEnv, stmt: &Stmt) -> Result<TypedStmt, Error> {
    match stmt {
        Stmt::Assign { name, value, span } => {
            let typed_value = type_check_expr(env, value)?;

            // Inside a function the target must be a declared local; a name
            // that is only global is readable but not assignable from here.
            let var_type = if env.in_function() {
                match env.lookup_innermost(name) {
                    Some(ty) => ty,
                    None => {
                        let error = if env.lookup_var(name).is_some() {
                            ErrorImpl::AssignToUndeclared { name: name.clone() }
                        } else {
                            ErrorImpl::NotAVariable { name: name.clone() }
                        };
                        return Err(Error::new(error, span.start.clone()));
                    }
                }
            } else {
                match env.lookup_var(name) {
                    Some(ty) => ty,
                    None => {
                        return Err(Error::new(
                            ErrorImpl::NotAVariable { name: name.clone() },
                            span.start.clone(),
                        ))
                    }
                }
            };

            if typed_value.ty != var_type {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: var_type.to_string(),
                        received: typed_value.ty.to_string(),
                    },
                    span.start.clone(),
                ));
            }

            Ok(TypedStmt {
                kind: TypedStmtKind::Assign {
                    name: name.clone(),
                    value: typed_value,
                },
                flow: Type::None,
            })
        }
        Stmt::If(if_stmt) => {
            let (typed_if, flow) = type_check_if(env, if_stmt)?;
            Ok(TypedStmt {
                kind: TypedStmtKind::If(typed_if),
                flow,
            })
        }
        Stmt::While {
            condition, body, ..
        } => {
            let typed_condition = type_check_expr(env, condition)?;
            if typed_condition.ty != Type::Bool {
                return Err(Error::new(
                    ErrorImpl::ConditionType {
                        received: typed_condition.ty.to_string(),
                    },
                    condition.span().start.clone(),
                ));
            }

            let (typed_body, _) = type_check_body(env, body)?;

            // The loop body may execute zero times, so a while never
            // guarantees a return.
            Ok(TypedStmt {
                kind: TypedStmtKind::While {
                    condition: typed_condition,
                    body: typed_body,
                },
                flow: Type::None,
            })
        }
        Stmt::Pass { .. } => Ok(TypedStmt {
            kind: TypedStmtKind::Pass,
            flow: Type::None,
        }),
        Stmt::Return { value, span } => {
            if !env.in_function() {
                return Err(Error::new(
                    ErrorImpl::ReturnOutsideFunction,
                    span.start.clone(),
                ));
            }

            let declared = env.return_type.unwrap();
            let typed_value = match value {
                Some(expr) => Some(type_check_expr(env, expr)?),
                None => None,
            };
            let return_type = typed_value
                .as_ref()
                .map(|value| value.ty)
                .unwrap_or(Type::None);

            if return_type != declared {
                return Err(Error::new(
                    ErrorImpl::TypeMismatch {
                        expected: declared.to_string(),
                        received: return_type.to_string(),
                    },
                    span.start.clone(),
                ));
            }

            Ok(TypedStmt {
                kind: TypedStmtKind::Return { value: typed_value },
                flow: return_type,
            })
        }
        Stmt::Expr { expr } => {
            let typed_expr = type_check_expr(env, expr)?;
            Ok(TypedStmt {
                kind: TypedStmtKind::Expr { expr: typed_expr },
                flow: Type::None,
            })
        }
    }
}

/// Checks a statement sequence. Its control-flow result is that of its last
/// statement: sequential composition.
pub fn type_check_body(env: &mut TypeEnv, body: &[Stmt]) -> Result<(Vec<TypedStmt>, Type), Error> {
    let mut flow = Type::None;
    let mut typed_body = Vec::new();
    for stmt in body {
        let typed_stmt = type_check_stmt(env, stmt)?;
        flow = typed_stmt.flow;
        typed_body.push(typed_stmt);
    }
    Ok((typed_body, flow))
}

fn type_check_if(env: &mut TypeEnv, if_stmt: &IfStmt) -> Result<(TypedIfStmt, Type), Error> {
    let typed_condition = type_check_expr(env, &if_stmt.condition)?;
    if typed_condition.ty != Type::Bool {
        return Err(Error::new(
            ErrorImpl::ConditionType {
                received: typed_condition.ty.to_string(),
            },
            if_stmt.condition.span().start.clone(),
        ));
    }

    let (typed_body, body_flow) = type_check_body(env, &if_stmt.body)?;

    // Without an else the branch can be skipped entirely; with one, the
    // chain only guarantees a return when every arm does.
    let (else_branch, flow) = match &if_stmt.else_branch {
        None => (None, Type::None),
        Some(ElseBranch::Elif(inner)) => {
            let (typed_inner, inner_flow) = type_check_if(env, inner)?;
            let flow = if body_flow == Type::None || inner_flow == Type::None {
                Type::None
            } else {
                body_flow
            };
            (Some(TypedElseBranch::Elif(Box::new(typed_inner))), flow)
        }
        Some(ElseBranch::Else(stmts)) => {
            let (typed_else, else_flow) = type_check_body(env, stmts)?;
            let flow = if body_flow == Type::None || else_flow == Type::None {
                Type::None
            } else {
                body_flow
            };
            (Some(TypedElseBranch::Else(typed_else)), flow)
        }
    };

    Ok((
        TypedIfStmt {
            condition: typed_condition,
            body: typed_body,
            else_branch,
        },
        flow,
    ))
}

pub fn type_check_var_def(env: &mut TypeEnv, var_def: &VarDef) -> Result<TypedVarDef, Error> {
    let literal_type = type_check_literal(&var_def.value);
    if literal_type != var_def.declared_type {
        return Err(Error::new(
            ErrorImpl::TypeMismatch {
                expected: var_def.declared_type.to_string(),
                received: literal_type.to_string(),
            },
            var_def.span.start.clone(),
        ));
    }

    env.declare_var(
        &var_def.name,
        var_def.declared_type,
        var_def.span.start.clone(),
    )?;

    Ok(TypedVarDef {
        name: var_def.name.clone(),
        declared_type: var_def.declared_type,
        value: var_def.value,
    })
}

pub fn type_check_func_def(env: &mut TypeEnv, func_def: &FuncDef) -> Result<TypedFuncDef, Error> {
    env.push_scope();

    for param in func_def.params.iter() {
        env.declare_var(
            &param.name,
            param.declared_type,
            func_def.span.start.clone(),
        )?;
    }
    env.return_type = Some(func_def.return_type);

    let mut typed_var_defs = Vec::new();
    for var_def in func_def.body.var_defs.iter() {
        typed_var_defs.push(type_check_var_def(env, var_def)?);
    }

    let checked = type_check_body(env, &func_def.body.stmts);

    env.pop_scope();
    env.return_type = None;

    let (typed_stmts, flow) = checked?;

    if flow != func_def.return_type {
        return Err(Error::new(
            ErrorImpl::MissingReturn {
                function: func_def.name.clone(),
            },
            func_def.span.start.clone(),
        ));
    }

    Ok(TypedFuncDef {
        name: func_def.name.clone(),
        params: func_def.params.clone(),
        return_type: func_def.return_type,
        body: TypedFuncBody {
            var_defs: typed_var_defs,
            stmts: typed_stmts,
            flow,
        },
    })
}

/// Type-checks a whole program, producing the fully annotated tree.
///
/// Function signatures are registered in a first pass before any body is
/// checked, so mutually-referencing functions resolve.
pub fn type_check(program: &Program) -> Result<TypedProgram, Error> {
    let mut env = TypeEnv::new();

    let mut typed_var_defs = Vec::new();
    for var_def in program.var_defs.iter() {
        typed_var_defs.push(type_check_var_def(&mut env, var_def)?);
    }

    for func_def in program.func_defs.iter() {
        env.declare_func(
            &func_def.name,
            FuncSig {
                params: func_def
                    .params
                    .iter()
                    .map(|param| param.declared_type)
                    .collect(),
                return_type: func_def.return_type,
            },
            func_def.span.start.clone(),
        )?;
    }

    let mut typed_func_defs = Vec::new();
    for func_def in program.func_defs.iter() {
        typed_func_defs.push(type_check_func_def(&mut env, func_def)?);
    }

    let mut typed_stmts = Vec::new();
    for stmt in program.stmts.iter() {
        typed_stmts.push(type_check_stmt(&mut env, stmt)?);
    }

    Ok(TypedProgram {
        var_defs: typed_var_defs,
        func_defs: typed_func_defs,
        stmts: typed_stmts,
    })
}
