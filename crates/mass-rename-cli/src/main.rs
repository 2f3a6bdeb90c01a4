mod config;
mod driver;
mod editor;
mod prompt;

use clap::Parser;
use config::{load_config, Args, Settings};
use log::{debug, LevelFilter};
use mass_rename_core::OsFs;
use std::io;
use std::process;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = load_config(&args).and_then(|config| {
        let settings = Settings::resolve(&args, &config, std::env::var("EDITOR").ok());
        debug!("Settings: {:?}", settings);

        let mut input = io::stdin().lock();
        let mut out = io::stdout().lock();
        driver::run(&settings, &OsFs::new(), &mut input, &mut out)
    });

    if let Err(e) = result {
        println!("[Error] {:#}", e);
        process::exit(1);
    }
}
