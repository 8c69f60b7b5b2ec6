//! Append-only text sinks for triage output
//!
//! Rendering code writes through [`std::fmt::Write`]; a [`LineSink`] collects the
//! text and hands every completed line to its [`LineOut`]. The same rendering code
//! therefore feeds the structured test log ([`TestLog`]) and plain console output
//! ([`Console`]).

use {
    log::Level,
    std::{fmt, io::Write},
};

/// `log` target carrying generated inputs, inference markers and output data
pub const TEST_LOG_TARGET: &str = "testlog";

/// Where completed lines go
pub trait LineOut {
    fn line(&mut self, line: &str);
}

/// One `log` record per line, on a fixed target and level
#[derive(Debug, Clone, Copy)]
pub struct LogTarget {
    pub target: &'static str,
    pub level: Level,
}

impl LineOut for LogTarget {
    fn line(&mut self, line: &str) {
        log::log!(target: self.target, self.level, "{}", line);
    }
}

/// Straight to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl LineOut for Stdout {
    fn line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{}", line);
    }
}

/// Line-buffering adapter from `fmt::Write` to a [`LineOut`]
///
/// A trailing partial line is emitted on [`flush`](LineSink::flush) or drop.
pub struct LineSink<L: LineOut> {
    out: L,
    pending: String,
}

pub type TestLog = LineSink<LogTarget>;
pub type Console = LineSink<Stdout>;

impl<L: LineOut> LineSink<L> {
    pub fn with_out(out: L) -> Self {
        LineSink {
            out,
            pending: String::new(),
        }
    }

    pub fn flush(&mut self) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.out.line(&line);
        }
    }

    pub fn into_inner(mut self) -> L
    where
        L: Clone,
    {
        self.flush();
        self.out.clone()
    }
}

impl LineSink<LogTarget> {
    /// Info records on the `testlog` target
    pub fn new() -> Self {
        Self::with_out(LogTarget {
            target: TEST_LOG_TARGET,
            level: Level::Info,
        })
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.out.level = level;
        self
    }
}

impl Default for LineSink<LogTarget> {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSink<Stdout> {
    pub fn new() -> Self {
        Self::with_out(Stdout)
    }
}

impl Default for LineSink<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: LineOut> fmt::Write for LineSink<L> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.pending.push_str(s);
        while let Some(end) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=end).collect();
            self.out.line(&line[..line.len() - 1]);
        }
        Ok(())
    }
}

impl<L: LineOut> Drop for LineSink<L> {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::fmt::Write as _};

    #[derive(Clone, Default)]
    struct Collect(Vec<String>);

    impl LineOut for Collect {
        fn line(&mut self, line: &str) {
            self.0.push(line.to_string());
        }
    }

    #[test]
    fn test_lines_split_on_newline() {
        let mut sink = LineSink::with_out(Collect::default());
        write!(sink, "a = [1, ").unwrap();
        write!(sink, "2]\nb = [3]\n").unwrap();
        let lines = sink.into_inner().0;
        assert_eq!(lines, vec!["a = [1, 2]", "b = [3]"]);
    }

    #[test]
    fn test_partial_line_flushed() {
        let mut sink = LineSink::with_out(Collect::default());
        write!(sink, "no newline").unwrap();
        assert!(sink.out.0.is_empty());
        sink.flush();
        assert_eq!(sink.out.0, vec!["no newline"]);
        sink.flush();
        assert_eq!(sink.out.0.len(), 1);
    }

    #[test]
    fn test_empty_lines_kept() {
        let mut sink = LineSink::with_out(Collect::default());
        write!(sink, "\n\nx\n").unwrap();
        assert_eq!(sink.into_inner().0, vec!["", "", "x"]);
    }

    #[test]
    fn test_test_log_defaults() {
        let sink = TestLog::new();
        assert_eq!(sink.out.target, TEST_LOG_TARGET);
        assert_eq!(sink.out.level, Level::Info);
        let sink = TestLog::new().with_level(Level::Debug);
        assert_eq!(sink.out.level, Level::Debug);
    }
}
