//! Event-driven extraction of arXiv entries from an Atom feed.

use chrono::DateTime;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::ArxivError;
use super::types::{Article, Author};

const SUMMARY_CHARS: usize = 500;

/// Fields collected while inside one `<entry>`.
#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    authors: Vec<String>,
    pdf_url: Option<String>,
    primary_category: Option<String>,
}

impl EntryBuilder {
    fn on_element(&mut self, e: &BytesStart<'_>) -> Result<(), ArxivError> {
        match e.local_name().as_ref() {
            b"link" => {
                let mut href = None;
                let mut is_pdf = false;
                for attr in e.attributes() {
                    let attr = attr?;
                    match attr.key.local_name().as_ref() {
                        b"href" => href = Some(attr.unescape_value()?.into_owned()),
                        b"title" => is_pdf = attr.unescape_value()? == "pdf",
                        _ => {}
                    }
                }
                if is_pdf {
                    self.pdf_url = href;
                }
            }
            b"primary_category" => {
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"term" {
                        self.primary_category = Some(attr.unescape_value()?.into_owned());
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_text(&mut self, path: &[String], text: &str) {
        let n = path.len();
        let Some(leaf) = path.last().map(String::as_str) else {
            return;
        };
        let parent = if n >= 2 { path[n - 2].as_str() } else { "" };

        let target = match (parent, leaf) {
            ("entry", "id") => &mut self.id,
            ("entry", "title") => &mut self.title,
            ("entry", "summary") => &mut self.summary,
            ("entry", "published") => &mut self.published,
            ("entry", "updated") => &mut self.updated,
            ("author", "name") => {
                if let Some(last) = self.authors.last_mut() {
                    last.push_str(text);
                }
                return;
            }
            _ => return,
        };
        target.push_str(text);
    }

    fn build(self) -> Article {
        let abstract_url = self.id.trim().to_string();
        let arxiv_id = abstract_url
            .rsplit_once("/abs/")
            .map(|(_, id)| id.to_string())
            .unwrap_or_else(|| abstract_url.clone());
        let pdf_url = self
            .pdf_url
            .unwrap_or_else(|| abstract_url.replacen("/abs/", "/pdf/", 1));
        let summary = collapse_whitespace(&self.summary);

        Article {
            title: collapse_whitespace(&self.title),
            authors: self
                .authors
                .iter()
                .map(|name| Author {
                    name: collapse_whitespace(name),
                })
                .collect(),
            submitted: format_timestamp(&self.published),
            updated: format_timestamp(&self.updated),
            arxiv_id,
            abstract_url,
            pdf_url,
            primary_category: self.primary_category.unwrap_or_default(),
            summary: (!summary.is_empty()).then(|| summary.chars().take(SUMMARY_CHARS).collect()),
        }
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// RFC 3339 to `YYYY-MM-DD HH:MM:SS UTC`; unparseable input is returned trimmed.
fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt
            .with_timezone(&chrono::Utc)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Parse every `<entry>` of an arXiv Atom feed, in document order.
///
/// arXiv reports query errors as a single entry whose id points at
/// `/api/errors`; that is returned as [`ArxivError::Api`].
pub fn parse_feed(xml: &str) -> Result<Vec<Article>, ArxivError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut articles = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut entry: Option<EntryBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if name == "entry" {
                    entry = Some(EntryBuilder::default());
                } else if let Some(b) = entry.as_mut() {
                    if name == "author" {
                        b.authors.push(String::new());
                    } else {
                        b.on_element(&e)?;
                    }
                }
                path.push(name);
            }
            Event::Empty(e) => {
                if let Some(b) = entry.as_mut() {
                    b.on_element(&e)?;
                }
            }
            Event::Text(t) => {
                if let Some(b) = entry.as_mut() {
                    let text = t.unescape()?;
                    b.on_text(&path, &text);
                }
            }
            Event::CData(c) => {
                if let Some(b) = entry.as_mut() {
                    let raw = c.into_inner();
                    b.on_text(&path, &String::from_utf8_lossy(&raw));
                }
            }
            Event::End(e) => {
                path.pop();
                if e.local_name().as_ref() == b"entry" {
                    if let Some(b) = entry.take() {
                        if b.id.contains("/api/errors") {
                            return Err(ArxivError::Api(collapse_whitespace(&b.summary)));
                        }
                        articles.push(b.build());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(articles)
}
