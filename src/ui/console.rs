//! Shared terminal output used by the thinking indicator and the reply stream.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cloneable handle to the process output stream.
///
/// Every call writes and flushes under one lock, so an indicator frame and a
/// reply fragment never interleave mid-write.
#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Console {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn print(&self, text: &str) -> io::Result<()> {
        let mut sink = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sink.write_all(text.as_bytes())?;
        sink.flush()
    }

    pub fn println(&self, text: &str) -> io::Result<()> {
        self.print(&format!("{text}\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::CaptureBuffer;

    #[test]
    fn clones_share_one_sink() {
        let buffer = CaptureBuffer::new();
        let console = Console::from_writer(buffer.clone());
        let other = console.clone();

        console.print("a").expect("write");
        other.println("b").expect("write");

        assert_eq!(buffer.contents(), "ab\n");
    }
}
