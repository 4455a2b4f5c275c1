use std::process;

fn main() {
    if let Err(e) = yrun::cli::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
