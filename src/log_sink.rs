use log::{error, warn};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;

/// Channel every request failure is reported under.
pub const ERROR_CHANNEL: &str = "request/error";

/// Destination for diagnostic messages, tagged by channel.
///
/// Writes must not fail from the caller's point of view; a sink that can hit
/// I/O errors deals with them itself.
pub trait LogSink: Send + Sync {
    fn write(&self, message: &str, channel: &str);
}

impl<T: LogSink + ?Sized> LogSink for Box<T> {
    fn write(&self, message: &str, channel: &str) {
        (**self).write(message, channel)
    }
}

impl<T: LogSink + ?Sized> LogSink for std::sync::Arc<T> {
    fn write(&self, message: &str, channel: &str) {
        (**self).write(message, channel)
    }
}

/// Forwards messages to the `log` facade at error level, using the channel as target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn write(&self, message: &str, channel: &str) {
        error!(target: channel, "{}", message);
    }
}

/// Appends one `<timestamp> [<channel>] <message>` line per write.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(FileSink {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn write(&self, message: &str, channel: &str) {
        let line = format!(
            "{} [{}] {}\n",
            humantime::format_rfc3339_seconds(SystemTime::now()),
            channel,
            message
        );

        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Err(e) = file.write_all(line.as_bytes()) {
            warn!("Failed to write to log file; {}", e);
        }
    }
}
