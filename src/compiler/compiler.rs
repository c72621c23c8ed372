//! Main code generator module.
//!
//! This module contains the Compiler structure and the `generate` entry
//! point that lowers a typed program into three independent WebAssembly
//! text fragments: global declarations, function definitions and top-level
//! statement code. The driver assembles them into a module (see `module`).

use std::collections::HashSet;

use crate::type_checker::typed_ast::{TypedFuncDef, TypedProgram, TypedVarDef};

use super::stmt::gen_body;

/// The three output fragments of one generation run. Each is an
/// independently valid instruction sequence; names referenced across
/// fragments are consistent with the declarations emitted here.
#[derive(Debug, Clone)]
pub struct CodeFragments {
    pub var_defs: String,
    pub func_defs: String,
    pub stmts: String,
}

/// Generation-scoped state. The loop-label counter lives here so labels are
/// stable per `generate` call and independent compilations never interfere.
pub struct Compiler {
    loop_counter: u32,
}

impl Compiler {
    fn new() -> Self {
        Compiler { loop_counter: 0 }
    }

    /// Mints a fresh label number for one block/loop pair.
    pub(super) fn next_label(&mut self) -> u32 {
        let label = self.loop_counter;
        self.loop_counter += 1;
        label
    }
}

/// Lowers a typed program. Pure except for the label counter, which is
/// freshly zeroed for every call.
pub fn generate(program: &TypedProgram) -> CodeFragments {
    let mut compiler = Compiler::new();

    let var_defs = gen_global_var_defs(&program.var_defs);
    let func_defs = program
        .func_defs
        .iter()
        .map(|func_def| gen_func_def(&mut compiler, func_def))
        .collect::<String>();

    // Top-level statements run outside any function framing but still get
    // one scratch local for statement-expression results.
    let scratch_var = "(local $scratch i32)";
    let stmts = scratch_var.to_string()
        + &gen_body(&mut compiler, &program.stmts, &HashSet::new());

    CodeFragments {
        var_defs,
        func_defs,
        stmts,
    }
}

fn gen_global_var_defs(var_defs: &[TypedVarDef]) -> String {
    var_defs
        .iter()
        .map(|var_def| {
            format!(
                "(global ${} (mut i32) (i32.const {}))",
                var_def.name,
                var_def.value.encoded_value()
            )
        })
        .collect()
}

/// Local declarations followed by their initialization code, in declaration
/// order. Declarations must precede all instructions in the function body.
fn gen_local_var_defs(var_defs: &[TypedVarDef]) -> String {
    let defines: String = var_defs
        .iter()
        .map(|var_def| format!("(local ${} i32)", var_def.name))
        .collect();
    let inits: String = var_defs
        .iter()
        .map(|var_def| {
            format!(
                "(i32.const {})(local.set ${})",
                var_def.value.encoded_value(),
                var_def.name
            )
        })
        .collect();
    defines + &inits
}

/// The set of names with local storage class inside a function: its
/// parameters plus its declared locals. Resolution is purely lexical.
fn local_names(func_def: &TypedFuncDef) -> HashSet<String> {
    let mut locals = HashSet::new();
    for param in func_def.params.iter() {
        locals.insert(param.name.clone());
    }
    for var_def in func_def.body.var_defs.iter() {
        locals.insert(var_def.name.clone());
    }
    locals
}

fn gen_func_def(compiler: &mut Compiler, func_def: &TypedFuncDef) -> String {
    let locals = local_names(func_def);

    let args_code = func_def
        .params
        .iter()
        .map(|param| format!("(param ${} i32)", param.name))
        .collect::<Vec<String>>()
        .join(" ");

    // Every function carries a single i32 result slot; a `none` return type
    // is represented the same way and callers discard the value.
    let ret_type_code = "(result i32)";

    let var_defs_code =
        String::from("(local $scratch i32)") + &gen_local_var_defs(&func_def.body.var_defs);
    let body_code = gen_body(compiler, &func_def.body.stmts, &locals);

    // Falling off the end yields the scratch slot, so a `none`-returning
    // function still produces its implicit result.
    format!(
        "(func ${} {} {} {} {} (local.get $scratch))",
        func_def.name, args_code, ret_type_code, var_defs_code, body_code
    )
}
