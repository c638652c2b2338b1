fn main() {
    if let Err(e) = confmeta_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
