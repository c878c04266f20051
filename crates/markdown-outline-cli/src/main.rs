use std::process;

fn main() {
    match markdown_outline_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("markdown-outline error: {err:#}");
            process::exit(1);
        }
    }
}
