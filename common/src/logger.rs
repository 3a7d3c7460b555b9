use chrono::Local;
use std::sync::OnceLock;

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub struct Logger {
    scope: Option<String>,
}

impl Logger {
    fn new(scope: Option<String>) -> Self {
        Self { scope }
    }

    pub fn log(&self, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        match self.scope {
            Some(ref scope) => println!("[{}][{}] {}", timestamp, scope, message),
            None => println!("[{}] {}", timestamp, message),
        }
    }
}

pub fn init_logger(scope: Option<String>) {
    LOGGER.get_or_init(|| Logger::new(scope));
}

pub fn log(message: &str) {
    if let Some(logger) = LOGGER.get() {
        logger.log(message);
    } else {
        eprintln!("Logger not initialized! Call init_logger() first.");
    }
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        $crate::logger::log(&format!($($arg)*))
    };
}
