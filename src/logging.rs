/*!
 * Diagnostic logging setup for the binary
 */

use std::io::Write;

use env_logger::Builder;
use log::Level;

/// Environment variable overriding the level chosen by `-v`
pub const LOG_ENV: &str = "SRCDUMP_LOG";

/// Map `-v` repetitions to a level filter
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

/// Install the env_logger backend writing colored lines to stderr
pub fn setup_logger(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let env = env_logger::Env::default().filter_or(LOG_ENV, level_for(verbosity));

    Builder::from_env(env)
        .format(|buf, record| {
            let level_color = match record.level() {
                Level::Error => "31",
                Level::Warn => "33",
                Level::Info => "32",
                Level::Debug => "36",
                Level::Trace => "35",
            };

            writeln!(
                buf,
                "\x1B[{}m[{}]\x1B[0m [{}] {}",
                level_color,
                record.level(),
                buf.timestamp(),
                record.args()
            )
        })
        .format_timestamp_secs()
        .try_init()
}
