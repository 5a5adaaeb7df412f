//! Export serializers for the in-memory contact list.
//!
//! Two interchange formats, both produced on demand from the same record
//! sequence:
//!
//! 1. [`csv`]   — tabular form: fixed eight-column header, every value
//!    quoted with embedded quotes doubled
//! 2. [`vcard`] — contact-card form: one vCard 3.0 block per record
//!
//! [`save`] writes either serialization to disk atomically and owns the
//! filename templates (`contacts_<date>.csv` / `.vcf`, per-person `.vcf`).

pub mod csv;
pub mod save;
pub mod vcard;

/// Content type tag for the tabular export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Content type tag for the contact-card export.
pub const VCARD_CONTENT_TYPE: &str = "text/vcard";
