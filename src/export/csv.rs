//! Tabular (CSV) serialization of the contact list.
//!
//! The format is fixed: the eight-column header below, then one row per
//! record with every value quoted and embedded quotes doubled. Quoting
//! unconditionally keeps the writer trivial and the output stable — commas
//! and newlines inside a field can never break a row.

use crate::contact::ContactRecord;
use chrono::NaiveDate;

/// Column order matches the data model and is part of the export contract.
pub const CSV_HEADER: &str = "Name,Title,Company,Email,Phone,Mobile,Website,Address";

/// Serialize records as CSV: header plus one quoted row per record,
/// joined by `\n`. N records produce exactly N+1 lines.
pub fn to_csv(contacts: &[ContactRecord]) -> String {
    let mut lines = Vec::with_capacity(contacts.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for c in contacts {
        let row = [
            &c.full_name,
            &c.title,
            &c.company,
            &c.email,
            &c.phone,
            &c.mobile,
            &c.website,
            &c.address,
        ]
        .map(|field| quote(field))
        .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// Filename for a dated bulk export: `contacts_<YYYY-MM-DD>.csv`.
pub fn csv_filename(date: NaiveDate) -> String {
    format!("contacts_{}.csv", date.format("%Y-%m-%d"))
}

/// Wrap a field in quotes, doubling any embedded quote characters.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
