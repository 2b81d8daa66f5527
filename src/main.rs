fn main() {
    if let Err(e) = causerie::cli::main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
