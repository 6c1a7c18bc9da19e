//! Error types for arXiv API operations.

use thiserror::Error;

/// Errors from arXiv API operations.
#[derive(Error, Debug)]
pub enum ArxivError {
    #[error("arXiv returned HTTP {0}")]
    HttpStatus(u16),
    #[error("arXiv rejected the query: {0}")]
    Api(String),
    #[error("Failed to parse Atom feed: {0}")]
    Xml(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl From<quick_xml::Error> for ArxivError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ArxivError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.to_string())
    }
}
