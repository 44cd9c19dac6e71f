//! Log output setup.

/// Routes the `log` macros to stdout as `[HH:MM:SS LEVEL target] message`.
///
/// Records from dependencies are kept at `Warn` and above. Output starts at `Info` until
/// [`set_level`] is called with the configured level.
pub fn init() -> Result<(), String> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Warn)
        .level_for(env!("CARGO_PKG_NAME"), log::LevelFilter::Trace)
        .chain(std::io::stdout())
        .apply()
        .map_err(|e| e.to_string())?;
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}

pub fn set_level(level: log::LevelFilter) {
    log::set_max_level(level);
    log::debug!("log level set to {}", level);
}
