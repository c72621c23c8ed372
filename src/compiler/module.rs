//! Module assembly.
//!
//! Wraps the three generated fragments into a complete, runnable
//! WebAssembly text module: imports for the built-in functions, the mutable
//! globals, the user function definitions, and an exported `main` running
//! the top-level statements. `main` returns the final value of the
//! top-level scratch slot, so the last evaluated expression is observable.
//!
//! The `print` import takes the value plus a type-tag constant (0 = int,
//! 1 = bool, 2 = none) and returns its value; every function here has a
//! single i32 result slot, including the `none`-returning ones.

use super::compiler::CodeFragments;

pub fn assemble_module(fragments: &CodeFragments) -> String {
    format!(
        "(module
  (import \"env\" \"print\" (func $print (param i32 i32) (result i32)))
  (import \"env\" \"abs\" (func $abs (param i32) (result i32)))
  (import \"env\" \"max\" (func $max (param i32 i32) (result i32)))
  (import \"env\" \"min\" (func $min (param i32 i32) (result i32)))
  (import \"env\" \"pow\" (func $pow (param i32 i32) (result i32)))
  {}
  {}
  (func (export \"main\") (result i32)
    {}
    (local.get $scratch)
  )
)
",
        fragments.var_defs, fragments.func_defs, fragments.stmts
    )
}
