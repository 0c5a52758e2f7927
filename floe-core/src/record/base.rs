//! Base implementation of records.
use crate::error::FloeError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically a metric like the success rate.
    Scalar(f32),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A 1-dimensional array.
    Array1(Vec<f32>),

    /// A 2-dimensional array in row-major order with its shape.
    Array2(Vec<f32>, [usize; 2]),

    /// A text value, like a rendered frame of an environment.
    String(String),
}

/// A container of key-value pairs of various data types.
///
/// ```rust
/// use floe_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("success_rate", 74.0);
/// record.insert("algorithm", RecordValue::String("sarsa".to_string()));
///
/// assert_eq!(record.get_scalar("success_rate").unwrap(), 74.0);
/// assert!(record.get_scalar("algorithm").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        let mut map = HashMap::new();
        map.insert(name.into(), RecordValue::Scalar(value));
        Self(map)
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets the value of the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite values of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    fn get_value(&self, k: &str) -> Result<&RecordValue, FloeError> {
        self.0
            .get(k)
            .ok_or_else(|| FloeError::RecordKeyError(k.to_string()))
    }

    /// Gets a scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f32, FloeError> {
        match self.get_value(k)? {
            RecordValue::Scalar(v) => Ok(*v),
            _ => Err(FloeError::RecordValueTypeError("Scalar".to_string())),
        }
    }

    /// Gets a timestamp.
    pub fn get_datetime(&self, k: &str) -> Result<DateTime<Local>, FloeError> {
        match self.get_value(k)? {
            RecordValue::DateTime(t) => Ok(*t),
            _ => Err(FloeError::RecordValueTypeError("DateTime".to_string())),
        }
    }

    /// Gets a 1-dimensional array.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, FloeError> {
        match self.get_value(k)? {
            RecordValue::Array1(v) => Ok(v.clone()),
            _ => Err(FloeError::RecordValueTypeError("Array1".to_string())),
        }
    }

    /// Gets a 2-dimensional array and its shape.
    pub fn get_array2(&self, k: &str) -> Result<(Vec<f32>, [usize; 2]), FloeError> {
        match self.get_value(k)? {
            RecordValue::Array2(v, s) => Ok((v.clone(), *s)),
            _ => Err(FloeError::RecordValueTypeError("Array2".to_string())),
        }
    }

    /// Gets a string.
    pub fn get_string(&self, k: &str) -> Result<String, FloeError> {
        match self.get_value(k)? {
            RecordValue::String(s) => Ok(s.clone()),
            _ => Err(FloeError::RecordValueTypeError("String".to_string())),
        }
    }

    /// Returns `true` if the record has no value.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of values in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let mut record = Record::from_scalar("a", 1.0);
        record.insert("b", RecordValue::Array1(vec![1.0, 2.0]));
        record.insert("c", RecordValue::Array2(vec![1.0, 2.0, 3.0, 4.0], [2, 2]));
        record.insert("d", RecordValue::String("frame".to_string()));
        let now = Local::now();
        record.insert("t", RecordValue::DateTime(now));

        assert_eq!(record.get_scalar("a").unwrap(), 1.0);
        assert_eq!(record.get_array1("b").unwrap(), vec![1.0, 2.0]);
        assert_eq!(record.get_array2("c").unwrap().1, [2, 2]);
        assert_eq!(record.get_string("d").unwrap(), "frame");
        assert_eq!(record.get_datetime("t").unwrap(), now);
        assert!(record.get_datetime("a").is_err());
        assert_eq!(
            record.get_scalar("e"),
            Err(FloeError::RecordKeyError("e".to_string()))
        );
        assert_eq!(
            record.get_string("a"),
            Err(FloeError::RecordValueTypeError("String".to_string()))
        );
    }

    #[test]
    fn test_merge_overwrites() {
        let r1 = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::Scalar(2.0)),
        ]);
        let mut r2 = Record::from_scalar("b", 3.0);
        let r = r1.clone().merge(r2.clone());
        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("b").unwrap(), 3.0);

        r2.merge_inplace(r1);
        assert_eq!(r2.get_scalar("b").unwrap(), 2.0);
    }
}
