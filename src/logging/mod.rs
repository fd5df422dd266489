use std::{fmt::Write as FmtWrite, sync::Once};

use anyhow::Result;
use flexi_logger::{
    DeferredNow, Logger, LoggerHandle, Record, TS_DASHES_BLANK_COLONS_DOT_BLANK,
};
use textwrap::{termwidth, Options};

/// Keeps the logger alive for the rest of the process. Dropping the handle
/// would shut down the async writer.
static mut LOGGER_HANDLE: Option<LoggerHandle> = None;

/// Used to synchronize access to LOGGER_HANDLE.
static INIT: Once = Once::new();

/// Setup console logging for this application.
///
/// Safe to call more than once; only the first call starts the logger.
pub fn setup() -> Result<()> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = (|| -> Result<()> {
            let handle = Logger::try_with_env_or_str("info")?
                .format(multiline_format)
                .start()?;
            unsafe { LOGGER_HANDLE = Some(handle) };
            log::info!(
                "Adjust the log level by setting RUST_LOG. \
                 By default RUST_LOG=info"
            );
            Ok(())
        })();
    });
    result
}

/// An opinionated formatting function for flexi_logger which automatically
/// wraps content to the terminal width.
pub fn multiline_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let size = termwidth().min(74);
    let wrap_options = Options::new(size)
        .initial_indent("┏ ")
        .subsequent_indent("┃ ");

    let mut full_line = String::new();
    writeln!(
        full_line,
        "{} [{}] [{}:{}]",
        record.level(),
        now.format(TS_DASHES_BLANK_COLONS_DOT_BLANK),
        record.file().unwrap_or("<unnamed>"),
        record.line().unwrap_or(0),
    )
    .expect("unable to format first log line");

    write!(&mut full_line, "{}", &record.args())
        .expect("unable to format log!");

    writeln!(w, "{}", textwrap::fill(&full_line, wrap_options))
}
