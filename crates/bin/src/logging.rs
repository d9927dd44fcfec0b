//! Tracing setup.
//!
//! Log lines go to stderr through the progress bar, which hides itself for
//! the duration of each write so the bar is redrawn underneath.

use indicatif::ProgressBar;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
pub(crate) fn init(verbose: bool, progress: &ProgressBar) {
    let default = if verbose {
        "trendscan=debug,trendscan_data=debug,trendscan_metrics=debug"
    } else {
        "trendscan=info,trendscan_data=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(ProgressWriter(progress.clone()))
        .init();
}

struct ProgressWriter(ProgressBar);

impl<'a> MakeWriter<'a> for ProgressWriter {
    type Writer = SuspendedStderr;

    fn make_writer(&'a self) -> Self::Writer {
        SuspendedStderr(self.0.clone())
    }
}

struct SuspendedStderr(ProgressBar);

impl Write for SuspendedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}
