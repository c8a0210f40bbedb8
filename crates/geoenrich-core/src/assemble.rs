//! Result assembly: attach coordinates to records and impose the final order.
//!
//! Records are ordered by two integer identifiers, ascending. Identifiers are
//! never a reason to fail a run: a missing or blank value sorts as `0`
//! silently, and a value that is not an integer sorts as `0` with a warning.
//! Integers beyond the `i64` range clamp to `i64::MIN`/`i64::MAX`.
//! The sort is stable, so records with equal keys keep their input
//! order and the output is reproducible regardless of lookup timing.

use crate::geocode::LookupOutcome;
use crate::record::{EnrichedRecord, FieldNames, Header, InputRecord};

/// Composite sort key: `(primary, secondary)`.
pub type SortKey = (i64, i64);

/// The sealed, sorted output of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    header: Header,
    records: Vec<EnrichedRecord>,
    coerced_sort_keys: usize,
}

impl ResultSet {
    /// Output header: the input header plus `Latitude` and `Longitude`.
    pub const fn header(&self) -> &Header {
        &self.header
    }

    pub fn records(&self) -> &[EnrichedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of non-numeric identifier values that were sorted as `0`.
    pub const fn coerced_sort_keys(&self) -> usize {
        self.coerced_sort_keys
    }
}

/// Parsed identifier value, or the reason it sorts as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortId {
    Value(i64),
    Missing,
    Invalid,
}

impl SortId {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::Missing,
            Some(raw) => raw
                .parse()
                .map_or_else(|_| Self::saturate(raw), Self::Value),
        }
    }

    /// Integers too wide for `i64` clamp to the nearest bound, so they still
    /// sort past every in-range value.
    fn saturate(raw: &str) -> Self {
        let (negative, digits) = match raw.as_bytes().first() {
            Some(b'-') => (true, &raw[1..]),
            Some(b'+') => (false, &raw[1..]),
            _ => (false, raw),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Invalid;
        }
        Self::Value(if negative { i64::MIN } else { i64::MAX })
    }

    pub const fn key(self) -> i64 {
        match self {
            Self::Value(v) => v,
            Self::Missing | Self::Invalid => 0,
        }
    }
}

/// Sort key for `record`, with unusable identifiers treated as `0`.
pub fn sort_key(record: &InputRecord, fields: &FieldNames) -> SortKey {
    (
        SortId::parse(record.get(&fields.primary_sort)).key(),
        SortId::parse(record.get(&fields.secondary_sort)).key(),
    )
}

/// Merges every `(record, outcome)` pair into an [`EnrichedRecord`] and sorts
/// the result by [`sort_key`].
///
/// `header` is the input header; the returned set carries it with the
/// coordinate columns appended.
pub fn assemble(
    header: &Header,
    pairs: Vec<(InputRecord, LookupOutcome)>,
    fields: &FieldNames,
) -> ResultSet {
    let mut coerced_sort_keys = 0;
    let mut keyed: Vec<(SortKey, EnrichedRecord)> = pairs
        .into_iter()
        .map(|(record, outcome)| {
            let primary = SortId::parse(record.get(&fields.primary_sort));
            let secondary = SortId::parse(record.get(&fields.secondary_sort));
            for (field, id) in [(&fields.primary_sort, primary), (&fields.secondary_sort, secondary)] {
                if id == SortId::Invalid {
                    coerced_sort_keys += 1;
                    tracing::warn!(
                        "Non-numeric '{field}' value {:?} sorted as 0",
                        record.get(field).unwrap_or_default()
                    );
                }
            }
            let key = (primary.key(), secondary.key());
            (key, EnrichedRecord::new(record, outcome.coordinate()))
        })
        .collect();

    keyed.sort_by_key(|(key, _)| *key);

    ResultSet {
        header: header.with_coordinates(),
        records: keyed.into_iter().map(|(_, record)| record).collect(),
        coerced_sort_keys,
    }
}
