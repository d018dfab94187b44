fn main() {
    if let Err(err) = traceboard::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
