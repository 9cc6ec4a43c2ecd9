use apod_gallery::RunOptions;

enum Flags {
    Exit,
    Run(RunOptions),
}

fn main() {
    let options = match handle_cli_flags() {
        Flags::Exit => return,
        Flags::Run(options) => options,
    };

    if let Err(err) = apod_gallery::run(options) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn handle_cli_flags() -> Flags {
    let mut options = RunOptions::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("APOD Gallery {}", apod_gallery::VERSION);
                return Flags::Exit;
            }
            "--help" | "-h" => {
                println!(
                    "APOD Gallery - Browse astronomy pictures of the day in a local gallery.\n\n  --no-browser         Serve the gallery without opening a browser\n  --version, -V        Show version and exit\n  --help,    -h        Show this help message"
                );
                return Flags::Exit;
            }
            "--no-browser" => {
                options.open_browser = Some(false);
            }
            other => {
                eprintln!("unknown flag: {other} (see --help)");
                std::process::exit(2);
            }
        }
    }
    Flags::Run(options)
}
