use std::fs::File;

use env_logger::{Builder, Env, Target};

use crate::config::data_path;

pub const LOG_FILE: &str = "retrovault.log";

/// Route `log` output to a file; the terminal belongs to the UI.
///
/// Level comes from `RUST_LOG`, `info` by default. If the file cannot be
/// created the app runs without logging.
pub fn init() {
    let path = data_path(LOG_FILE);
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(_) => return,
    };

    let result = Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::info!("RetroVault starting, logging to {}", path.display());
    }
}
