use super::{AggregateRecorder, Record, RecordStorage, Recorder};

/// Buffered recorder.
///
/// This is used for keeping the sequence of rendered frames of a rollout, or
/// the records flushed during training, for later inspection.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// The number of records in the buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Takes the records out of the buffer.
    pub fn into_records(self) -> Vec<Record> {
        self.buf
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}

impl AggregateRecorder for BufferedRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    /// Pushes the aggregated record, with the key `"step"`, to the buffer.
    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let mut record = self.storage.aggregate();
        record.insert("step", super::RecordValue::Scalar(step as f32));
        self.buf.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_pushes_aggregate() {
        let mut recorder = BufferedRecorder::new();
        recorder.write(Record::from_scalar("x", 1.0));
        recorder.flush(1);
        assert_eq!(recorder.len(), 1);

        recorder.store(Record::from_scalar("x", 1.0));
        recorder.store(Record::from_scalar("x", 3.0));
        recorder.flush(2);
        let records = recorder.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get_scalar("x_mean").unwrap(), 2.0);
        assert_eq!(records[1].get_scalar("step").unwrap(), 2.0);
    }
}
