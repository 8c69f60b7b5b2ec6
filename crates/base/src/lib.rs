pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

pub mod sink;
pub use sink::{Console, LineOut, LineSink, LogTarget, Stdout, TEST_LOG_TARGET, TestLog};

// downstream crates log through base::log
pub use log;
