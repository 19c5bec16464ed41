use std::path::Path;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!(
                "No program path provided.\n\
                 Please specify a path, for example:\n\
                 ls8 assets/programs/mult.ls8"
            );
            std::process::exit(1);
        }
    };

    log::info!("Running program: '{}'", path);
    if let Err(err) = ls8::run(Path::new(&path)) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
