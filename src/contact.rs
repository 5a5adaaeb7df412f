//! The contact record extracted from a business card.

use serde::{Deserialize, Serialize};

/// One extracted business-card entity.
///
/// Field names serialise in camelCase to match the wire schema declared to
/// the extraction service ([`crate::prompts::response_schema`]). Every field
/// is plain text; the service is instructed to use an empty string for
/// anything it cannot find, and `#[serde(default)]` keeps deserialisation
/// tolerant if a field is omitted entirely (only `fullName` is required by
/// the schema).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRecord {
    /// Full name of the person. May be empty if the card carried none.
    pub full_name: String,
    /// Job title or role.
    pub title: String,
    /// Company name.
    pub company: String,
    /// Email address.
    pub email: String,
    /// Work or landline phone number.
    pub phone: String,
    /// Mobile phone number.
    pub mobile: String,
    /// Company website URL.
    pub website: String,
    /// Physical address.
    pub address: String,
}

impl ContactRecord {
    /// True when every field is empty — a card the service detected but
    /// could not read anything from.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_empty()
            && self.title.is_empty()
            && self.company.is_empty()
            && self.email.is_empty()
            && self.phone.is_empty()
            && self.mobile.is_empty()
            && self.website.is_empty()
            && self.address.is_empty()
    }
}
