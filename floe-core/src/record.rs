//! Types and traits for recording values during training and evaluation.
//!
//! * [`Record`] - A container of key-value pairs of various data types
//! * [`RecordValue`] - The types of values a [`Record`] can hold
//! * [`Recorder`] - Writes records to some destination
//! * [`AggregateRecorder`] - Stores records and writes values aggregated over them
//! * [`RecordStorage`] - Storage with aggregation over scalar values
//! * [`BufferedRecorder`] - Keeps all written records in memory
//! * [`LogRecorder`] - Writes records with the [`log`] crate
//! * [`NullRecorder`] - Discards all records
//!
//! ```rust
//! use floe_core::record::{Record, RecordValue};
//!
//! // following values are obtained with some process in reality
//! let state = 3;
//! let reward = -1f32;
//!
//! let mut record = Record::empty();
//! record.insert("state", RecordValue::Scalar(state as f32));
//! record.insert("reward", RecordValue::Scalar(reward));
//! assert_eq!(record.get_scalar("reward").unwrap(), -1.0);
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
