//! Progress output for pipeline runs.
//!
//! The pipeline prints human-readable progress lines to stdout as each
//! table is built and written. Hard failures go to stderr in `main`.

/// Log level for display
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

fn emit(level: LogLevel, message: &str) {
    let prefix = match level {
        LogLevel::Info => "   ",
        LogLevel::Success => "   ✓",
        LogLevel::Warning => "   ⚠️",
        LogLevel::Error => "   ❌",
    };
    println!("{} {}", prefix, message);
}

/// Convenient logging functions
pub fn log_info(msg: impl AsRef<str>) {
    emit(LogLevel::Info, msg.as_ref());
}

pub fn log_success(msg: impl AsRef<str>) {
    emit(LogLevel::Success, msg.as_ref());
}

pub fn log_warning(msg: impl AsRef<str>) {
    emit(LogLevel::Warning, msg.as_ref());
}

pub fn log_error(msg: impl AsRef<str>) {
    emit(LogLevel::Error, msg.as_ref());
}
