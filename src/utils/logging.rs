use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Append-only plain-text record of completed exchanges (`--log <FILE>`).
///
/// The file is only ever written; it is never read back into a conversation.
pub struct TranscriptLog {
    file_path: Option<PathBuf>,
}

impl TranscriptLog {
    pub fn disabled() -> Self {
        Self { file_path: None }
    }

    /// Enable logging to `path`, failing early if the file cannot be opened
    /// for appending.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            file_path: Some(path),
        })
    }

    pub fn log_exchange(&self, user: &str, assistant_label: &str, reply: &str) -> io::Result<()> {
        self.write_entry(&format!("You: {user}"))?;
        self.write_entry(&format!("{assistant_label}{reply}"))
    }

    pub fn log_marker(&self, text: &str) -> io::Result<()> {
        self.write_entry(&format!(
            "## {} ({})",
            text,
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ))
    }

    fn write_entry(&self, content: &str) -> io::Result<()> {
        let Some(file_path) = self.file_path.as_ref() else {
            return Ok(());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        let mut writer = BufWriter::new(file);

        for line in content.lines() {
            writeln!(writer, "{line}")?;
        }
        // Blank line between entries.
        writeln!(writer)?;

        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn disabled_log_writes_nothing() {
        let log = TranscriptLog::disabled();
        log.log_exchange("q", "Bot: ", "a").expect("noop");
    }

    #[test]
    fn exchanges_are_appended_in_order() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let log = TranscriptLog::open(&path).expect("open");

        log.log_exchange("Hello", "Doubao: ", "Hi!\nHow can I help?")
            .expect("write");
        log.log_exchange("Bye", "Doubao: ", "See you").expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(
            contents,
            "You: Hello\n\nDoubao: Hi!\nHow can I help?\n\nYou: Bye\n\nDoubao: See you\n\n"
        );
    }

    #[test]
    fn markers_are_prefixed() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("chat.log");
        let log = TranscriptLog::open(&path).expect("open");

        log.log_marker("Conversation cleared").expect("write");

        let contents = fs::read_to_string(&path).expect("read");
        assert!(contents.starts_with("## Conversation cleared ("));
    }

    #[test]
    fn unopenable_path_fails_early() {
        let dir = tempdir().expect("tempdir");
        let missing_dir = dir.path().join("nope").join("chat.log");
        assert!(TranscriptLog::open(missing_dir).is_err());
    }
}
