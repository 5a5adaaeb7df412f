//! Contact-card (vCard 3.0) serialization of the contact list.
//!
//! One fixed-template block per record. Phone numbers keep their WORK/CELL
//! split so importers file them correctly; the address lands in the street
//! slot of `ADR` since cards carry a single free-text address line.

use crate::contact::ContactRecord;
use chrono::NaiveDate;

/// Serialize records as vCard 3.0 blocks joined by `\n`.
pub fn to_vcard(contacts: &[ContactRecord]) -> String {
    contacts
        .iter()
        .map(vcard_block)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `BEGIN:VCARD … END:VCARD` block for a single record.
fn vcard_block(contact: &ContactRecord) -> String {
    let (given, family) = split_full_name(&contact.full_name);
    format!(
        "BEGIN:VCARD\n\
         VERSION:3.0\n\
         FN:{full_name}\n\
         N:{family};{given};;;\n\
         ORG:{company}\n\
         TITLE:{title}\n\
         TEL;TYPE=WORK,VOICE:{phone}\n\
         TEL;TYPE=CELL,VOICE:{mobile}\n\
         EMAIL;TYPE=WORK,INTERNET:{email}\n\
         URL:{website}\n\
         ADR;TYPE=WORK:;;{address};;;;\n\
         END:VCARD",
        full_name = contact.full_name,
        family = family,
        given = given,
        company = contact.company,
        title = contact.title,
        phone = contact.phone,
        mobile = contact.mobile,
        email = contact.email,
        website = contact.website,
        address = contact.address,
    )
}

/// Split a full name into `(given, family)` on whitespace.
///
/// More than one token: the last token is the family name, the remainder
/// (space-joined) the given name. A single token is all given name, family
/// name empty.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut tokens: Vec<&str> = full_name.split_whitespace().collect();
    if tokens.len() > 1 {
        let family = tokens.pop().unwrap_or_default();
        (tokens.join(" "), family.to_string())
    } else {
        (tokens.join(" "), String::new())
    }
}

/// Filename for a dated bulk export: `contacts_<YYYY-MM-DD>.vcf`.
pub fn vcard_filename(date: NaiveDate) -> String {
    format!("contacts_{}.vcf", date.format("%Y-%m-%d"))
}

/// Filename for a single-record export: the full name with whitespace runs
/// replaced by underscores. A nameless record falls back to `contact.vcf`.
pub fn single_vcard_filename(contact: &ContactRecord) -> String {
    let stem = contact
        .full_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    if stem.is_empty() {
        "contact.vcf".to_string()
    } else {
        format!("{stem}.vcf")
    }
}
