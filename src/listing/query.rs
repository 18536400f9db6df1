//! Query state of a list screen and its address-bar encoding.

use serde::Serialize;

use crate::domain::types::TypeConstraintError;

/// Page sizes offered by every list screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::Twenty,
        PageSize::Fifty,
    ];

    pub const fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(TypeConstraintError::InvalidPageSize(value))
    }
}

/// Trims `value`; blank input means "no filter".
pub fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Filter set of one list screen, addressed by wire key.
pub trait Filters: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Wire keys in the order they appear in the query string.
    const KEYS: &'static [&'static str];

    /// Current value of `key`, `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Sets `key` from raw input. Blank input clears the filter; unknown keys
    /// are ignored.
    fn set(&mut self, key: &str, raw: &str);

    /// Non-empty filters as key/value pairs.
    fn to_pairs(&self) -> Vec<(String, String)> {
        Self::KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| ((*key).to_string(), value)))
            .collect()
    }

    fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut filters = Self::default();
        filters.merge(pairs);
        filters
    }

    /// Overwrites every filter named in `pairs`, leaving the others as they are.
    fn merge(&mut self, pairs: &[(String, String)]) {
        for (key, value) in pairs {
            self.set(key, value);
        }
    }
}

/// Single free-text keyword, used by the catalogue screens.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordFilters {
    pub keyword: Option<String>,
}

impl Filters for KeywordFilters {
    const KEYS: &'static [&'static str] = &["keyword"];

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "keyword" => self.keyword.clone(),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, raw: &str) {
        if key == "keyword" {
            self.keyword = normalize(raw);
        }
    }
}

/// Filters of the loan request screen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestFilters {
    pub phone: Option<String>,
    pub full_name: Option<String>,
    pub is_processed: Option<bool>,
}

impl Filters for RequestFilters {
    const KEYS: &'static [&'static str] = &["phone", "fullName", "isProcessed"];

    fn get(&self, key: &str) -> Option<String> {
        match key {
            "phone" => self.phone.clone(),
            "fullName" => self.full_name.clone(),
            "isProcessed" => self.is_processed.map(|flag| flag.to_string()),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, raw: &str) {
        match key {
            "phone" => self.phone = normalize(raw),
            "fullName" => self.full_name = normalize(raw),
            "isProcessed" => {
                self.is_processed = match raw.trim() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                }
            }
            _ => {}
        }
    }
}

pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "pageSize";

/// Filters plus pagination. `page` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery<F> {
    pub filters: F,
    pub page: usize,
    pub page_size: PageSize,
}

impl<F: Filters> Default for ListQuery<F> {
    fn default() -> Self {
        Self {
            filters: F::default(),
            page: 1,
            page_size: PageSize::default(),
        }
    }
}

impl<F: Filters> ListQuery<F> {
    /// Parses an address-bar query. Unparsable page numbers fall back to 1
    /// and unsupported page sizes to the default.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = Self {
            filters: F::from_pairs(pairs),
            ..Self::default()
        };
        for (key, value) in pairs {
            match key.as_str() {
                PAGE_KEY => {
                    query.page = value.trim().parse::<usize>().unwrap_or(1).max(1);
                }
                PAGE_SIZE_KEY => {
                    query.page_size = value
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|size| PageSize::try_from(size).ok())
                        .unwrap_or_default();
                }
                _ => {}
            }
        }
        query
    }

    pub fn from_query_str(raw: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_html_form::from_str(raw.trim_start_matches('?')).unwrap_or_default();
        Self::from_pairs(&pairs)
    }

    /// Pairs for the address bar; defaults (`page=1`, `pageSize=10`) and empty
    /// filters are omitted.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.to_pairs();
        if self.page > 1 {
            pairs.push((PAGE_KEY.to_string(), self.page.to_string()));
        }
        if self.page_size != PageSize::default() {
            pairs.push((PAGE_SIZE_KEY.to_string(), self.page_size.get().to_string()));
        }
        pairs
    }

    /// Pairs sent to a backend search endpoint, pagination always included.
    pub fn to_search_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.to_pairs();
        pairs.push((PAGE_KEY.to_string(), self.page.to_string()));
        pairs.push((PAGE_SIZE_KEY.to_string(), self.page_size.get().to_string()));
        pairs
    }

    pub fn to_query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }

    /// Filters only, without pagination. Used for exports.
    pub fn filter_query_string(&self) -> String {
        encode_pairs(&self.filters.to_pairs())
    }
}

pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    serde_html_form::to_string(pairs).unwrap_or_default()
}
