use std::{
    env,
    fs::{self, create_dir, read_to_string},
    path::PathBuf,
    rc::Rc,
    time::Instant,
};

use minipy::{
    compiler::{compiler::generate, module::assemble_module},
    display_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

fn main() {
    if !PathBuf::from("build").exists() {
        create_dir("build").unwrap();
    }

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        panic!("Incorrect arguments provided!");
    }

    let file_path: &str = &args[1];
    let file_name = if file_path.contains("/") {
        file_path.split("/").last().unwrap()
    } else {
        file_path
    };

    let start = Instant::now();

    let mut path_buf_string = env::current_dir().unwrap().into_os_string();
    path_buf_string.push("/");
    path_buf_string.push(file_path);
    let file_contents = read_to_string(path_buf_string.clone()).expect("Failed to read file!");

    let tokens = tokenize(file_contents, Some(String::from(file_name)));

    if tokens.is_err() {
        display_error(tokens.err().unwrap(), PathBuf::from(path_buf_string));
        std::process::exit(1);
    }

    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let parsed_ast = parse(tokens.unwrap(), Rc::new(String::from(file_name)));

    println!("Parsed in {:?}", parse_start.elapsed());

    if parsed_ast.is_err() {
        display_error(parsed_ast.err().unwrap(), PathBuf::from(path_buf_string));
        std::process::exit(1);
    }

    let ast = parsed_ast.unwrap();

    let type_check_start = Instant::now();
    let typed_ast = type_check(&ast);

    println!("Type checked in {:?}", type_check_start.elapsed());

    if typed_ast.is_err() {
        display_error(typed_ast.err().unwrap(), PathBuf::from(path_buf_string));
        std::process::exit(1);
    }

    let generate_start = Instant::now();
    let fragments = generate(&typed_ast.unwrap());
    let module = assemble_module(&fragments);

    println!("Generated in {:?}", generate_start.elapsed());

    let stem = file_name.strip_suffix(".py").unwrap_or(file_name);
    let out_path = PathBuf::from(format!("build/{}.wat", stem));
    fs::write(&out_path, module).expect("Failed to write output file!");

    println!("Wrote {}", out_path.as_os_str().to_string_lossy());
    println!("Total time: {:?}", start.elapsed());
}
