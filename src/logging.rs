//! Diagnostic logging to stderr

use colored::Colorize;
use log::LevelFilter;

/// Parse a level name (`error`, `warn`, `info`, `debug`, `trace`, `off`)
pub fn parse_level(name: &str) -> anyhow::Result<LevelFilter> {
    name.trim()
        .parse::<LevelFilter>()
        .map_err(|_| anyhow::anyhow!("Unknown log level: {}", name))
}

/// Install the global logger. Call once, before any pipeline work.
pub fn init_logging(level: LevelFilter, color: bool) -> anyhow::Result<()> {
    if !color {
        colored::control::set_override(false);
    }

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level().to_string();
            let level = if color {
                match record.level() {
                    log::Level::Error => level.red().bold().to_string(),
                    log::Level::Warn => level.yellow().to_string(),
                    log::Level::Info => level.green().to_string(),
                    _ => level.dimmed().to_string(),
                }
            } else {
                level
            };
            out.finish(format_args!("[{} {}] {}", level, record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
