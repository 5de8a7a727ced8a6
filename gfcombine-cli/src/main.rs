//! Binary entrypoint for gfcombine-cli

fn main() {
    if let Err(err) = gfcombine_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
