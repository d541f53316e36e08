use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use textnode::{App, Cli, Config, FileKeyValueStore, NotePersistence, NoteStore, Result};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().or_else(Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }

    let persistence = NotePersistence::with_key(
        FileKeyValueStore::new(&config.data_dir),
        config.storage_key.clone(),
    );
    let store = NoteStore::open(persistence)?.with_date_format(config.date_format.clone())?;

    let mut app = App::new(store, config, config_path, cli.verbose);
    app.run(cli.command)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", console::style(format!("Error: {}", e)).red());
            ExitCode::FAILURE
        }
    }
}
