use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);
}

/// Stores records, then writes values aggregated from them.
pub trait AggregateRecorder {
    /// Stores the record.
    fn store(&mut self, record: Record);

    /// Writes values aggregated from the stored records and discards them.
    ///
    /// `step` is typically the number of iterations done so far.
    fn flush(&mut self, step: i64);
}
