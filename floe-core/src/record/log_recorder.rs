use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use itertools::Itertools;
use log::info;

/// Writes records with the [`log`] crate at info level.
///
/// Only scalars and strings are written; arrays and timestamps are skipped.
#[derive(Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    fn format(record: &Record) -> String {
        record
            .iter()
            .filter_map(|(k, v)| match v {
                RecordValue::Scalar(v) => Some(format!("{} = {:.3}", k, v)),
                RecordValue::String(s) => Some(format!("{} = {}", k, s)),
                _ => None,
            })
            .sorted()
            .join(", ")
    }
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        info!("{}", Self::format(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        info!("iter {}: {}", step, Self::format(&record));
    }
}
