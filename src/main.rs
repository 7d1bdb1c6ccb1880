fn main() {
    if let Err(err) = projector_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
