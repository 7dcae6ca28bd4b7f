use std::fs::{File, OpenOptions};

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How the MCP server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// stdin/stdout, the default for local MCP clients
    Stdio,
    /// Streamable HTTP plus the kiosk data endpoints
    Stream,
}

impl TransportMode {
    /// stdio clients treat any stderr output during the handshake as a broken
    /// connection, so only stream mode writes there.
    pub fn logs_to_stderr(self) -> bool {
        matches!(self, TransportMode::Stream)
    }
}

/// Install the global subscriber for `mode`.
///
/// In stdio mode nothing is installed unless a log file is given. Stream mode
/// always logs to stderr and additionally to the file when one is given.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging(mode: TransportMode, log_file: Option<&str>) -> anyhow::Result<()> {
    let file = log_file.map(open_log_file).transpose()?;
    let console = mode.logs_to_stderr();
    if file.is_none() && !console {
        return Ok(());
    }

    let file_layer = file.map(|file| fmt::layer().with_writer(file).with_ansi(false));
    let console_layer = console.then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

fn open_log_file(path: &str) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stream_mode_uses_stderr() {
        assert!(TransportMode::Stream.logs_to_stderr());
        assert!(!TransportMode::Stdio.logs_to_stderr());
    }

    #[test]
    fn stdio_without_file_installs_nothing() {
        assert!(init_logging(TransportMode::Stdio, None).is_ok());
    }
}
