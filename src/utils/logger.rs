use colored::{ColoredString, Colorize};
use env_logger::Builder;
use log::{Level, LevelFilter};
use std::io::Write;

fn level_tag(level: Level) -> Option<ColoredString> {
    match level {
        Level::Error => Some("ERROR".red()),
        Level::Warn => Some("WARN".yellow()),
        _ => None,
    }
}

/// Install the crate logger on stderr. Stdout stays free for locality records and the timing line.
/// Later calls are ignored.
///
/// Warnings and errors carry the module target; debug lines carry the thread name
/// (`cachecp-worker-3`, `cachecp-source`) so per-job lines can be told apart.
pub fn setup_logging(verbose: bool) {
    let level = match verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME").cyan();
            if let Some(tag) = level_tag(record.level()) {
                return writeln!(
                    buf,
                    "[{} {} {}] {}",
                    name,
                    tag,
                    record.target().white(),
                    record.args()
                );
            }
            if record.level() >= Level::Debug {
                let thread = std::thread::current();
                let thread_name = thread.name().unwrap_or("main");
                return writeln!(buf, "[{} {}] {}", name, thread_name.dimmed(), record.args());
            }
            writeln!(buf, "[{}] {}", name, record.args())
        })
        .try_init();
}
