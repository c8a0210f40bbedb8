//! Row-level data model: headers, input records, coordinates and enriched
//! records.
//!
//! Records share their [`Header`] through an `Arc`, so cloning a record only
//! copies its values. Field lookup is by name and follows the header order.

use crate::common::types::{LATITUDE_FIELD, LONGITUDE_FIELD};
use core::fmt;
use std::sync::Arc;

/// Ordered column names of a CSV source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    names: Arc<[String]>,
}

impl Header {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of `name`. When a name repeats, the last column wins.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().rposition(|n| n == name)
    }

    /// Returns this header with the latitude and longitude columns appended.
    pub fn with_coordinates(&self) -> Self {
        Self::new(
            self.names
                .iter()
                .map(String::as_str)
                .chain([LATITUDE_FIELD, LONGITUDE_FIELD]),
        )
    }
}

/// One row of the source address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    header: Header,
    values: Vec<String>,
}

impl InputRecord {
    pub const fn new(header: Header, values: Vec<String>) -> Self {
        Self { header, values }
    }

    /// Builds a record from `(field, value)` pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(Header::new(names), values)
    }

    pub const fn header(&self) -> &Header {
        &self.header
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Value of the named field, or `None` if the header lacks it or the row
    /// is too short to hold it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.header
            .position(name)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Values padded or truncated to the header width.
    pub fn row(&self) -> impl Iterator<Item = &str> {
        (0..self.header.len()).map(|i| self.values.get(i).map_or("", String::as_str))
    }
}

/// A latitude/longitude pair where either side may be absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinate {
    pub const ABSENT: Self = Self {
        latitude: None,
        longitude: None,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub const fn is_absent(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none()
    }

    /// Latitude rendered for CSV output; absent values become empty fields.
    pub fn latitude_field(&self) -> String {
        render(self.latitude)
    }

    /// Longitude rendered for CSV output; absent values become empty fields.
    pub fn longitude_field(&self) -> String {
        render(self.longitude)
    }
}

/// Whole values keep one decimal place, so `151.0` is written as `151.0`
/// rather than `151`.
fn render(value: Option<f64>) -> String {
    value
        .map(|v| {
            if v.is_finite() && v.fract() == 0.0 {
                format!("{v:.1}")
            } else {
                v.to_string()
            }
        })
        .unwrap_or_default()
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude_field(), self.longitude_field())
    }
}

/// An [`InputRecord`] with its geocoded [`Coordinate`] appended.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    record: InputRecord,
    coordinate: Coordinate,
}

impl EnrichedRecord {
    pub const fn new(record: InputRecord, coordinate: Coordinate) -> Self {
        Self { record, coordinate }
    }

    pub const fn record(&self) -> &InputRecord {
        &self.record
    }

    pub const fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    /// Output row: every original field in header order, then latitude and
    /// longitude.
    pub fn to_row(&self) -> Vec<String> {
        let mut row: Vec<String> = self.record.row().map(str::to_string).collect();
        row.push(self.coordinate.latitude_field());
        row.push(self.coordinate.longitude_field());
        row
    }
}

/// Names of the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    /// Street address line.
    pub address: String,
    /// Suburb or town.
    pub locality: String,
    /// First sort key.
    pub primary_sort: String,
    /// Second sort key, applied within equal primary keys.
    pub secondary_sort: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            address: "Address".to_string(),
            locality: "Suburb / Town".to_string(),
            primary_sort: "APA number".to_string(),
            secondary_sort: "ACC number".to_string(),
        }
    }
}
