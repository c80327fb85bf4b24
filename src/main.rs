// src/main.rs

mod app_logic;
mod core;
mod platform_layer;

use crate::app_logic::FolderMenuLogic;
use crate::app_logic::handler::APP_NAME;
use crate::core::{
    ConfigManagerOperations, CoreConfigManager, CoreFolderStorage, FolderStorageOperations,
    InMemoryFolderStorage, MenuConfig, path_utils,
};
use crate::platform_layer::ConsolePlatform;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::error::Error;
use std::fs::File;
use std::io;
use std::sync::Arc;

const LOG_FILENAME: &str = "folder_menu.log";

/*
 * Sets up a terminal logger for warnings and above (so the menu output stays readable)
 * and a file logger in the app config dir at the configured level. If the log file
 * cannot be created, only the terminal logger is installed.
 */
fn initialize_logging(file_level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_location_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    match path_utils::app_file_path(APP_NAME, LOG_FILENAME).map(File::create) {
        Some(Ok(file)) => loggers.push(WriteLogger::new(file_level, config, file)),
        Some(Err(e)) => eprintln!("Could not create log file, logging to terminal only: {e}"),
        None => eprintln!("No config directory for the log file, logging to terminal only."),
    }

    if let Err(e) = CombinedLogger::init(loggers) {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config_manager: Arc<dyn ConfigManagerOperations> = Arc::new(CoreConfigManager::new());
    // Logging is not up yet, so a config problem is reported once it is.
    let (config, config_error) = match config_manager.load_config(APP_NAME) {
        Ok(config) => (config, None),
        Err(e) => (MenuConfig::default(), Some(e)),
    };

    initialize_logging(config.log_level_filter());
    log::info!("{APP_NAME} starting.");
    if let Some(e) = config_error {
        log::warn!("Main: Could not load menu config, using defaults: {e}");
    }

    let storage: Arc<dyn FolderStorageOperations> = match CoreFolderStorage::for_app(APP_NAME) {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            log::warn!("Main: {e}, folders are kept for this session only.");
            Arc::new(InMemoryFolderStorage::new())
        }
    };
    let mut logic = FolderMenuLogic::new(config, storage, config_manager);

    let stdin = io::stdin();
    let mut platform = ConsolePlatform::new(stdin.lock(), io::stdout());
    platform.run(&mut logic)?;

    log::info!("{APP_NAME} exiting.");
    Ok(())
}
