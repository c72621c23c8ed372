//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works correctly from
//! source code through tokenization, parsing, type checking and
//! WebAssembly text generation.

use std::rc::Rc;

use minipy::{
    compiler::{
        compiler::{generate, CodeFragments},
        module::assemble_module,
    },
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

fn compile(source: &str) -> Result<CodeFragments, Error> {
    let tokens = tokenize(source.to_string(), Some("test.py".to_string()))?;
    let ast = parse(tokens, Rc::new("test.py".to_string()))?;
    let typed_ast = type_check(&ast)?;
    Ok(generate(&typed_ast))
}

#[test]
fn test_compile_global_increment() {
    let source = "x: int = 5\nx = x + 1";
    let fragments = compile(source).unwrap();

    assert_eq!(fragments.var_defs, "(global $x (mut i32) (i32.const 5))");
    assert!(fragments
        .stmts
        .contains("(global.get $x)(i32.const 1)(i32.add)(global.set $x)"));
    assert!(fragments.func_defs.is_empty());
}

#[test]
fn test_compile_function() {
    let source = "def add(a: int, b: int) -> int:\n    return a + b";
    let fragments = compile(source).unwrap();

    assert!(fragments
        .func_defs
        .contains("(func $add (param $a i32) (param $b i32) (result i32)"));
    assert!(fragments
        .func_defs
        .contains("(local.get $a)(local.get $b)(i32.add)(return)"));
}

#[test]
fn test_compile_recursive_function() {
    let source = "def fact(n: int) -> int:\n    if n <= 1:\n        return 1\n    else:\n        return n * fact(n - 1)\nprint(fact(5))";
    let fragments = compile(source).unwrap();

    assert!(fragments.func_defs.contains("(call $fact)"));
    assert!(fragments.stmts.contains("(call $print)"));
}

#[test]
fn test_compile_while_loop_program() {
    let source = "i: int = 0\ntotal: int = 0\nwhile i < 10:\n    total = total + i\n    i = i + 1\nprint(total)";
    let fragments = compile(source).unwrap();

    assert!(fragments.stmts.contains("(block $block_0 (loop $loop_0 "));
    assert!(fragments.stmts.contains("(br $loop_0)"));
}

#[test]
fn test_compile_two_loops_have_distinct_labels() {
    let source = "i: int = 0\nwhile i < 3:\n    i = i + 1\nwhile i > 0:\n    i = i - 1";
    let fragments = compile(source).unwrap();

    assert!(fragments.stmts.contains("$block_0"));
    assert!(fragments.stmts.contains("$block_1"));
}

#[test]
fn test_compile_elif_chain() {
    let source = "x: int = 5\nif x > 10:\n    print(1)\nelif x > 0:\n    print(2)\nelse:\n    print(3)";
    let fragments = compile(source).unwrap();

    // The elif arm nests as a second structured if inside the else block.
    assert_eq!(fragments.stmts.matches("(if (then ").count(), 2);
    assert_eq!(fragments.stmts.matches("(else ").count(), 2);
}

#[test]
fn test_compile_builtins() {
    let source = "print(max(3, min(1, 2)))\nprint(abs(-4))\nprint(pow(2, 10))";
    let fragments = compile(source).unwrap();

    assert!(fragments.stmts.contains("(call $max)"));
    assert!(fragments.stmts.contains("(call $min)"));
    assert!(fragments.stmts.contains("(call $abs)"));
    assert!(fragments.stmts.contains("(call $pow)"));
}

#[test]
fn test_assembled_module_shape() {
    let source = "x: int = 1\ndef f() -> int:\n    return x\nprint(f())";
    let module = assemble_module(&compile(source).unwrap());

    assert!(module.starts_with("(module"));
    assert!(module.contains("(import \"env\" \"print\""));
    assert!(module.contains("(global $x (mut i32) (i32.const 1))"));
    assert!(module.contains("(func $f "));
    assert!(module.contains("(func (export \"main\") (result i32)"));
    assert!(module.trim_end().ends_with(")"));
}

#[test]
fn test_compile_type_error_produces_no_output() {
    let source = "x: int = 5\nx = True";
    let result = compile(source);

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "TypeError");
}

#[test]
fn test_compile_missing_return_fails() {
    let source = "def f(x: int) -> int:\n    if x > 0:\n        return 1";
    let result = compile(source);

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ControlFlowError");
}

#[test]
fn test_compile_lex_error() {
    let result = compile("x: int = $");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "UnrecognisedToken");
}

#[test]
fn test_compile_parse_error() {
    let result = compile("def f(:\n    pass");

    assert!(result.is_err());
}

#[test]
fn test_compile_reference_error() {
    let result = compile("print(y)");

    assert!(result.is_err());
    assert_eq!(result.err().unwrap().get_error_name(), "ReferenceError");
}

#[test]
fn test_compile_empty_program() {
    let fragments = compile("").unwrap();

    assert!(fragments.var_defs.is_empty());
    assert!(fragments.func_defs.is_empty());
    assert_eq!(fragments.stmts, "(local $scratch i32)");
}

#[test]
fn test_compile_comments_and_blank_lines() {
    let source = "# setup\nx: int = 1\n\n# bump it\nx = x + 1";
    let fragments = compile(source).unwrap();

    assert!(fragments.var_defs.contains("(global $x"));
    assert!(fragments.stmts.contains("(global.set $x)"));
}

#[test]
fn test_compile_mutual_recursion() {
    let source = "def even(n: int) -> bool:\n    if n == 0:\n        return True\n    else:\n        return odd(n - 1)\ndef odd(n: int) -> bool:\n    if n == 0:\n        return False\n    else:\n        return even(n - 1)\nprint(even(10))";
    let fragments = compile(source).unwrap();

    assert!(fragments.func_defs.contains("(func $even "));
    assert!(fragments.func_defs.contains("(func $odd "));
}
