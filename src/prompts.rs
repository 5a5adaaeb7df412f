//! Instruction text and response schema for the extraction call.
//!
//! Centralising the prompt and the schema here serves two purposes:
//!
//! 1. **Single source of truth** — the instruction and the declared output
//!    contract must stay in lockstep (the instruction describes the
//!    empty-string convention the schema relies on); editing one place keeps
//!    them consistent.
//!
//! 2. **Testability** — unit tests can inspect the schema without spinning
//!    up a real extraction service, so schema regressions are caught cheaply.

use serde_json::{json, Value};

/// Instruction sent alongside the card image.
///
/// The empty-string convention matters: downstream export code treats every
/// field as plain text and renders missing values as `""`, so the service
/// must never emit nulls or omit fields it cannot read.
pub const EXTRACTION_INSTRUCTION: &str = "\
Extract contact information from this image which may contain one or more business cards. \
Return a JSON array where each object represents a detected card. \
Ensure accuracy for phone numbers and emails. \
If a field is not found, leave it as an empty string.";

/// Declared output schema: an array of 8-field contact objects.
///
/// Passed as `generationConfig.responseSchema` so the service constrains its
/// own output; only `fullName` is required, everything else defaults to an
/// empty string per the instruction.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "fullName": { "type": "STRING", "description": "Full name of the person" },
                "title":    { "type": "STRING", "description": "Job title or role" },
                "company":  { "type": "STRING", "description": "Company name" },
                "email":    { "type": "STRING", "description": "Email address" },
                "phone":    { "type": "STRING", "description": "Work or landline phone number" },
                "mobile":   { "type": "STRING", "description": "Mobile phone number" },
                "website":  { "type": "STRING", "description": "Company website URL" },
                "address":  { "type": "STRING", "description": "Physical address" }
            },
            "required": ["fullName"]
        }
    })
}
