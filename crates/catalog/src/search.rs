//! Catalog search: multi-term contains matching with column selection,
//! similarity ranking and pagination, plus autocomplete suggestions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{CatalogEntry, PartFields};

/// Columns a query can be restricted to, in ranking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchColumn {
    ItemNumber,
    Description,
    Size,
    VendorName,
}

impl SearchColumn {
    pub const ALL: [SearchColumn; 4] =
        [Self::ItemNumber, Self::Description, Self::Size, Self::VendorName];

    fn value<'a>(&self, entry: &'a CatalogEntry) -> &'a str {
        match self {
            Self::ItemNumber => &entry.key,
            Self::Description => &entry.fields.description,
            Self::Size => &entry.fields.size,
            Self::VendorName => &entry.fields.vendor_name,
        }
    }

    /// Score when the whole query matches this column.
    fn weight(&self) -> u8 {
        match self {
            Self::ItemNumber => 4,
            Self::Description => 3,
            Self::Size => 2,
            Self::VendorName => 1,
        }
    }
}

impl FromStr for SearchColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "item_number" => Ok(Self::ItemNumber),
            "description" => Ok(Self::Description),
            "size" => Ok(Self::Size),
            "vendor_name" => Ok(Self::VendorName),
            other => Err(format!(
                "unknown column '{other}' (expected item_number, description, size or vendor_name)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub per_page: usize,
    pub suggestion_limit: usize,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self { per_page: 20, suggestion_limit: 10 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    /// Empty means every column.
    pub columns: Vec<SearchColumn>,
    /// 1-based; clamped into range.
    pub page: usize,
    pub per_page: usize,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, defaults: &SearchDefaults) -> Self {
        Self { text: text.into(), columns: Vec::new(), page: 1, per_page: defaults.per_page }
    }

    /// Selected columns in ranking order, whatever order they were given in.
    fn selected_columns(&self) -> Vec<SearchColumn> {
        SearchColumn::ALL
            .into_iter()
            .filter(|c| self.columns.is_empty() || self.columns.contains(c))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub item_number: String,
    #[serde(flatten)]
    pub fields: PartFields,
    pub similarity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Strip wildcard characters; users type `%` and `*` out of habit.
fn clean_query(text: &str) -> String {
    text.replace(['%', '*'], "").trim().to_string()
}

/// Search live entries.
///
/// Every whitespace-separated term must appear (case-insensitively) in at
/// least one selected column. Hits are ranked by the weightiest selected
/// column containing the whole query, then by item number.
pub fn search<'a, I>(entries: I, query: &SearchQuery) -> SearchPage
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let per_page = query.per_page.max(1);
    let cleaned = clean_query(&query.text).to_lowercase();
    if cleaned.is_empty() {
        return SearchPage {
            query: query.text.clone(),
            results: Vec::new(),
            total: 0,
            page: 1,
            per_page,
            total_pages: 1,
            has_next: false,
            has_previous: false,
        };
    }

    let terms: Vec<&str> = cleaned.split_whitespace().collect();
    let columns = query.selected_columns();

    let mut matched: Vec<(u8, &CatalogEntry)> = entries
        .into_iter()
        .filter(|e| !e.deleted)
        .filter_map(|entry| {
            let values: Vec<String> =
                columns.iter().map(|c| c.value(entry).to_lowercase()).collect();
            let all_terms = terms.iter().all(|t| values.iter().any(|v| v.contains(t)));
            if !all_terms {
                return None;
            }
            let similarity = columns
                .iter()
                .zip(&values)
                .find(|(_, v)| v.contains(cleaned.as_str()))
                .map(|(c, _)| c.weight())
                .unwrap_or(0);
            Some((similarity, entry))
        })
        .collect();

    matched.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| a.key.cmp(&b.key)));

    let total = matched.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let results = matched
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|(similarity, e)| SearchHit {
            item_number: e.key.clone(),
            fields: e.fields.clone(),
            similarity,
        })
        .collect();

    SearchPage {
        query: query.text.clone(),
        results,
        total,
        page,
        per_page,
        total_pages,
        has_next: page < total_pages,
        has_previous: page > 1,
    }
}

/// Autocomplete entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub item_number: String,
    pub description: String,
}

const SUGGESTION_MIN_CHARS: usize = 2;
const SUGGESTION_DESC_CHARS: usize = 100;

/// Item numbers or descriptions containing `text`, in item-number order.
pub fn suggest<'a, I>(entries: I, text: &str, limit: usize) -> Vec<Suggestion>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let needle = text.trim().to_lowercase();
    if needle.chars().count() < SUGGESTION_MIN_CHARS {
        return Vec::new();
    }

    let mut hits: Vec<&CatalogEntry> = entries
        .into_iter()
        .filter(|e| !e.deleted)
        .filter(|e| {
            e.key.to_lowercase().contains(&needle)
                || e.fields.description.to_lowercase().contains(&needle)
        })
        .collect();
    hits.sort_by(|a, b| a.key.cmp(&b.key));
    hits.dedup_by(|a, b| a.key == b.key);

    hits.into_iter()
        .take(limit)
        .map(|e| Suggestion {
            item_number: e.key.clone(),
            description: truncate(&e.fields.description, SUGGESTION_DESC_CHARS),
        })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
