//! Derives the free-text geocoding query for a record.

use crate::common::types::QUERY_SEPARATOR;
use crate::record::{FieldNames, InputRecord};
use core::fmt;

/// Query text for one record, or the marker for a record with nothing to look
/// up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeQuery {
    /// `"<address>, <locality>"`, exactly as sent to the provider.
    Address(String),
    /// Both address and locality are blank.
    Unaddressable,
}

impl GeocodeQuery {
    pub const fn is_addressable(&self) -> bool {
        matches!(self, Self::Address(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Address(text) => Some(text),
            Self::Unaddressable => None,
        }
    }
}

impl fmt::Display for GeocodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(text) => f.write_str(text),
            Self::Unaddressable => f.write_str("<unaddressable>"),
        }
    }
}

/// Joins the address and locality fields of `record` with `", "`.
///
/// Missing fields count as empty. A result that is blank or only the
/// separator once trimmed yields [`GeocodeQuery::Unaddressable`].
pub fn format_query(record: &InputRecord, fields: &FieldNames) -> GeocodeQuery {
    let address = record.get(&fields.address).unwrap_or_default();
    let locality = record.get(&fields.locality).unwrap_or_default();
    let text = format!("{address}{QUERY_SEPARATOR}{locality}");

    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == QUERY_SEPARATOR.trim() {
        GeocodeQuery::Unaddressable
    } else {
        GeocodeQuery::Address(text)
    }
}
