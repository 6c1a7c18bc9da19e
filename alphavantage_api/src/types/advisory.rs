use serde::{Deserialize, Serialize};

/// Top-level messages Alpha Vantage returns with HTTP 200 instead of data.
///
/// `Note` and `Information` are sent when the key is throttled or the
/// endpoint needs a premium plan; `Error Message` when the request itself
/// is invalid (unknown symbol, bad function).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(rename = "Information", default, skip_serializing_if = "Option::is_none")]
    pub information: Option<String>,
    #[serde(rename = "Error Message", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Advisory {
    /// The advisory text, preferring the error message.
    pub fn message(&self) -> Option<&str> {
        self.error_message
            .as_deref()
            .or(self.note.as_deref())
            .or(self.information.as_deref())
    }

    /// True for the throttling/plan notices, false for request errors.
    pub fn is_throttled(&self) -> bool {
        self.error_message.is_none() && (self.note.is_some() || self.information.is_some())
    }
}
