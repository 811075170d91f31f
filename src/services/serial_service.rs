use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use crate::configs::settings::Serial;

/// Line source for the microcontroller stream.
///
/// The port path is opened as a character device; line speed is assumed to
/// be configured on the tty by the host. Read failures drop the handle and
/// retry after the configured delay, so a flapping device never kills the
/// bridge.
pub struct SerialService {
    settings: Serial,
    lines: Option<Lines<BufReader<File>>>,
}

impl SerialService {
    pub fn new(settings: Serial) -> Self {
        Self {
            settings,
            lines: None,
        }
    }

    /// Next non-empty line, or `None` when nothing is available yet.
    pub async fn read_line(&mut self) -> Option<String> {
        if self.lines.is_none() {
            self.connect().await;
        }
        let lines = self.lines.as_mut()?;

        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim().to_owned();
                (!line.is_empty()).then_some(line)
            }
            Ok(None) => {
                // EOF: the device went away, reopen on the next call
                self.lines = None;
                tokio::time::sleep(self.reconnect_delay()).await;
                None
            }
            Err(e) => {
                tracing::warn!("Serial read failed: {}", e);
                self.lines = None;
                tokio::time::sleep(self.reconnect_delay()).await;
                None
            }
        }
    }

    async fn connect(&mut self) {
        match File::open(&self.settings.port_path).await {
            Ok(file) => {
                tracing::info!(
                    "Connected to serial device {} at {} baud",
                    self.settings.port_path,
                    self.settings.baud_rate,
                );
                self.lines = Some(BufReader::new(file).lines());
            }
            Err(e) => {
                tracing::warn!("Serial connect failed: {}", e);
                tokio::time::sleep(self.reconnect_delay()).await;
            }
        }
    }

    fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.settings.reconnect_delay_ms)
    }
}
