//! Searchable dropdown ranking with a free-text fallback.

use serde::Serialize;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 50;

pub const ROLE_CATALOG: &[&str] = &[
    "Software Engineer",
    "Backend Engineer",
    "Frontend Engineer",
    "Full Stack Engineer",
    "Data Scientist",
    "Data Analyst",
    "Data Engineer",
    "Machine Learning Engineer",
    "Product Manager",
    "Product Designer",
    "DevOps Engineer",
    "Site Reliability Engineer",
    "QA Engineer",
    "Business Analyst",
    "Solutions Architect",
];

pub const INDUSTRY_CATALOG: &[&str] = &[
    "Technology",
    "Finance",
    "Healthcare",
    "E-commerce",
    "Education",
    "Consulting",
    "Media",
    "Gaming",
    "Government",
    "Manufacturing",
    "Energy",
    "Transportation",
    "Telecommunications",
    "Retail",
    "Nonprofit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchKind {
    Exact,
    Prefix,
    WordPrefix,
    Substring,
}

/// Case-insensitive equality, Unicode-aware (unlike `eq_ignore_ascii_case`).
pub fn same_value(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn classify(label: &str, query: &str) -> Option<MatchKind> {
    let label = label.to_lowercase();
    if label == query {
        Some(MatchKind::Exact)
    } else if label.starts_with(query) {
        Some(MatchKind::Prefix)
    } else if label.split_whitespace().any(|w| w.starts_with(query)) {
        Some(MatchKind::WordPrefix)
    } else if label.contains(query) {
        Some(MatchKind::Substring)
    } else {
        None
    }
}

pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Ranks `items` by how well `label(item)` matches `query`.
/// An empty query keeps every item in alphabetical order.
pub fn rank<'a, T, F>(items: &'a [T], query: &str, limit: usize, label: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(MatchKind, String, &T)> = items
        .iter()
        .filter_map(|item| {
            let text = label(item);
            let kind = if query.is_empty() {
                Some(MatchKind::Substring)
            } else {
                classify(text, &query)
            };
            kind.map(|k| (k, text.to_lowercase(), item))
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    scored.into_iter().take(limit).map(|(_, _, item)| item).collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValueSuggestions {
    pub options: Vec<String>,
    /// The typed text, offered as a custom value when nothing matches it exactly.
    pub free_text: Option<String>,
}

/// Suggests values from `catalog`, deduplicated case-insensitively.
pub fn suggest_values(catalog: &[String], query: &str, limit: usize) -> ValueSuggestions {
    let mut unique: Vec<String> = Vec::with_capacity(catalog.len());
    for value in catalog {
        let value = value.trim();
        if value.is_empty() || unique.iter().any(|u| same_value(u, value)) {
            continue;
        }
        unique.push(value.to_string());
    }

    let options: Vec<String> = rank(&unique, query, limit, |s| s.as_str())
        .into_iter()
        .cloned()
        .collect();

    let typed = query.trim();
    let exact = unique.iter().any(|u| same_value(u, typed));
    ValueSuggestions {
        options,
        free_text: (!typed.is_empty() && !exact).then(|| typed.to_string()),
    }
}
