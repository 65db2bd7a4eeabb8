//! Console logger for the `log` facade.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger at `Info`. A logger that is already set stays.
pub(crate) fn install() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    level.trim().parse().ok()
}

/// Change the console log level ("off", "error", "warn", "info", "debug", "trace").
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    log::set_max_level(filter);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }
}
