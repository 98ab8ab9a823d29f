use shared_types::{CapturingLogger, InternalLogger, RawBatchEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn capturing_logger() -> (Arc<CapturingLogger>, Arc<dyn InternalLogger>) {
    let logger = Arc::new(CapturingLogger::new());
    let dyn_logger: Arc<dyn InternalLogger> = logger.clone();
    (logger, dyn_logger)
}

pub fn make_event(len: usize, fill: u8) -> RawBatchEvent {
    RawBatchEvent::new(vec![fill; len])
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// Route `tracing` output to the test harness, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
