use std::fs;
use std::path::PathBuf;

const LOG_FILE: &str = "trackline.log";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger already installed: {0}")]
    SetLogger(#[from] log::SetLoggerError),
}

/// Installs the global logger: stdout, plus a file in the data directory when
/// it is writable. Returns the log file path in use.
pub fn setup(is_debug: bool) -> Result<Option<PathBuf>, Error> {
    let level = if is_debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level)
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .level_for("naga", log::LevelFilter::Warn)
        .level_for("cosmic_text", log::LevelFilter::Warn)
        .level_for("iced_wgpu", log::LevelFilter::Warn)
        .chain(std::io::stdout());

    let mut file_in_use = None;
    let mut file_error = None;

    match open_log_file() {
        Ok(Some((path, file))) => {
            dispatch = dispatch.chain(file);
            file_in_use = Some(path);
        }
        Ok(None) => {}
        Err(err) => file_error = Some(err),
    }

    dispatch.apply()?;

    if let Some(err) = file_error {
        log::warn!("Logging to stdout only: {err}");
    }
    Ok(file_in_use)
}

fn open_log_file() -> Result<Option<(PathBuf, fs::File)>, Error> {
    let Some(path) = data::data_path(Some(LOG_FILE)) else {
        return Ok(None);
    };

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fern::log_file(&path)?;

    Ok(Some((path, file)))
}
