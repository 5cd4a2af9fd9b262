//! Submission payload types.

use serde::{Deserialize, Serialize};

/// A consultation request exactly as the form sent it.
///
/// Every field defaults to empty so a missing key and a blank value are
/// handled by the same validation path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub business_name: String,
}

/// A validated consultation request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Empty when the form left the optional field blank.
    pub business_name: String,
}

impl Submission {
    /// Business name for display, with a placeholder when not provided.
    pub fn business_name_or_placeholder(&self) -> &str {
        if self.business_name.is_empty() {
            "-"
        } else {
            &self.business_name
        }
    }
}
