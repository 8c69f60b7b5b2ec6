use base::{LineSink, TEST_LOG_TARGET, TestLog};
use log::{Log, Metadata, Record};
use std::{
    fmt::Write,
    sync::{Mutex, Once},
};

struct Capture {
    records: Mutex<Vec<(String, log::Level, String)>>,
}

static CAPTURE: Capture = Capture {
    records: Mutex::new(Vec::new()),
};

impl Log for Capture {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push((
            record.target().to_string(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

fn install() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

fn captured(marker: &str) -> Vec<(String, log::Level, String)> {
    CAPTURE
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|(_, _, message)| message.contains(marker))
        .cloned()
        .collect()
}

#[test]
fn test_test_log_emits_one_record_per_line() {
    install();
    let mut sink = TestLog::new();
    write!(sink, "sink-a x = [1, 2]\nsink-a y = [").unwrap();
    write!(sink, "3]\n").unwrap();

    let records = captured("sink-a");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].0, TEST_LOG_TARGET);
    assert_eq!(records[0].1, log::Level::Info);
    assert_eq!(records[0].2, "sink-a x = [1, 2]");
    assert_eq!(records[1].2, "sink-a y = [3]");
}

#[test]
fn test_test_log_flushes_on_drop() {
    install();
    {
        let mut sink = TestLog::new().with_level(log::Level::Warn);
        write!(sink, "sink-b unterminated").unwrap();
        assert!(captured("sink-b").is_empty());
    }
    let records = captured("sink-b");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1, log::Level::Warn);
}

#[test]
fn test_console_writes_without_logging() {
    install();
    let mut sink = base::Console::new();
    writeln!(sink, "sink-c to stdout").unwrap();
    drop(sink);
    assert!(captured("sink-c").is_empty());
}

#[test]
fn test_custom_target() {
    install();
    let mut sink = LineSink::with_out(base::LogTarget {
        target: "triage",
        level: log::Level::Debug,
    });
    writeln!(sink, "sink-d custom").unwrap();
    let records = captured("sink-d");
    assert_eq!(records[0].0, "triage");
    assert_eq!(records[0].1, log::Level::Debug);
}
