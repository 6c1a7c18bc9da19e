//! arXiv client for the most recent submissions in a category.
//!
//! The export API answers with an Atom feed; [`atom`] turns it into
//! [`Article`]s without a full Atom model.

pub mod atom;
pub mod client;
pub mod error;
pub mod types;

pub use client::ArxivClient;
pub use error::ArxivError;
pub use types::{categories, Article, Author, Category};
