use std::{env, process};

use bilancio_core::{cli, init};

fn main() {
    init();

    if let Err(err) = cli::run(env::args().skip(1)) {
        eprintln!("Error: {err}");
        eprintln!("{}", cli::usage());
        process::exit(1);
    }
}
