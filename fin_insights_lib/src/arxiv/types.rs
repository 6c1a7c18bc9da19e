/// An arXiv submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub authors: Vec<Author>,
    /// `YYYY-MM-DD HH:MM:SS UTC`
    pub submitted: String,
    pub updated: String,
    /// Short id with version, e.g. `2410.12345v1`.
    pub arxiv_id: String,
    pub abstract_url: String,
    pub pdf_url: String,
    pub primary_category: String,
    /// First 500 characters of the abstract.
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("cs.AI", "Artificial Intelligence"),
    ("cs.CL", "Computation and Language"),
    ("cs.LG", "Machine Learning"),
    ("cs.CV", "Computer Vision"),
    ("cs.NE", "Neural and Evolutionary Computing"),
    ("cs.RO", "Robotics"),
    ("cs.SE", "Software Engineering"),
];

/// Commonly requested categories.
pub fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|&(id, name)| Category { id, name })
        .collect()
}
