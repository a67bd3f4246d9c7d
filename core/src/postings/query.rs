//! List query model and its URL query-string codec.
//!
//! # Design
//! `parse` accepts anything that looks like a URL query (pairs of strings)
//! and always yields a normalized [`ListQuery`]: bad numbers fall back to
//! defaults, out-of-range numbers are clamped, blank strings disappear.
//! `build` emits only what differs from [`ListQuery::default`], so the
//! default query serializes to nothing. Filter values are kept as plain
//! strings here; they are not checked against the posting enumerations.

use std::collections::BTreeMap;

use url::form_urlencoded;

use super::types::{EmploymentType, PostingStatus, Source, WorkMode};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_SIZE: u32 = 25;
pub const MAX_SIZE: u32 = 200;

/// Attributes the list endpoint can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterKey {
    Company,
    Title,
    EmploymentType,
    Source,
    WorkMode,
    Status,
}

impl FilterKey {
    /// Serialization order for both URL and API parameters.
    pub const ALL: [FilterKey; 6] = [
        FilterKey::Company,
        FilterKey::Title,
        FilterKey::EmploymentType,
        FilterKey::Source,
        FilterKey::WorkMode,
        FilterKey::Status,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Company => "company",
            FilterKey::Title => "title",
            FilterKey::EmploymentType => "employmentType",
            FilterKey::Source => "source",
            FilterKey::WorkMode => "workMode",
            FilterKey::Status => "status",
        }
    }
}

/// Active list filters. An absent key means "no filter on that attribute".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingFilters {
    pub company: Option<String>,
    pub title: Option<String>,
    pub employment_type: Option<String>,
    pub source: Option<String>,
    pub work_mode: Option<String>,
    pub status: Option<String>,
}

impl PostingFilters {
    pub fn get(&self, key: FilterKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Set or clear a filter; blank values clear it.
    pub fn set(&mut self, key: FilterKey, value: Option<String>) {
        *self.slot_mut(key) = value.filter(|v| !v.is_empty());
    }

    pub fn with(mut self, key: FilterKey, value: impl Into<String>) -> Self {
        self.set(key, Some(value.into()));
        self
    }

    pub fn with_source(self, source: Source) -> Self {
        self.with(FilterKey::Source, source.as_str())
    }

    pub fn with_employment_type(self, employment_type: EmploymentType) -> Self {
        self.with(FilterKey::EmploymentType, employment_type.as_str())
    }

    pub fn with_work_mode(self, work_mode: WorkMode) -> Self {
        self.with(FilterKey::WorkMode, work_mode.as_str())
    }

    pub fn with_status(self, status: PostingStatus) -> Self {
        self.with(FilterKey::Status, status.as_str())
    }

    /// Present filters in [`FilterKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FilterKey, &str)> + '_ {
        FilterKey::ALL
            .into_iter()
            .filter_map(move |key| self.get(key).map(|value| (key, value)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn slot(&self, key: FilterKey) -> &Option<String> {
        match key {
            FilterKey::Company => &self.company,
            FilterKey::Title => &self.title,
            FilterKey::EmploymentType => &self.employment_type,
            FilterKey::Source => &self.source,
            FilterKey::WorkMode => &self.work_mode,
            FilterKey::Status => &self.status,
        }
    }

    fn slot_mut(&mut self, key: FilterKey) -> &mut Option<String> {
        match key {
            FilterKey::Company => &mut self.company,
            FilterKey::Title => &mut self.title,
            FilterKey::EmploymentType => &mut self.employment_type,
            FilterKey::Source => &mut self.source,
            FilterKey::WorkMode => &mut self.work_mode,
            FilterKey::Status => &mut self.status,
        }
    }
}

/// Page, size, sort and filters for the postings list.
///
/// `sort` is an opaque backend token such as `company` or `-company`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
    pub filters: PostingFilters,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_SIZE,
            sort: None,
            filters: PostingFilters::default(),
        }
    }
}

/// Normalize URL query pairs into a [`ListQuery`].
///
/// A key that appears more than once is treated as absent.
pub fn parse<I, K, V>(pairs: I) -> ListQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut single: BTreeMap<String, Option<String>> = BTreeMap::new();
    for (key, value) in pairs {
        single
            .entry(key.as_ref().to_string())
            .and_modify(|slot| *slot = None)
            .or_insert_with(|| Some(value.as_ref().to_string()));
    }
    let get = |key: &str| single.get(key).and_then(|v| v.as_deref());

    let page = to_int(get("page"))
        .map(|n| n.clamp(f64::from(DEFAULT_PAGE), f64::from(u32::MAX)) as u32)
        .unwrap_or(DEFAULT_PAGE);
    let size = to_int(get("size"))
        .map(|n| n.clamp(1.0, f64::from(MAX_SIZE)) as u32)
        .unwrap_or(DEFAULT_SIZE);
    let sort = to_str(get("sort"));

    let mut filters = PostingFilters::default();
    for key in FilterKey::ALL {
        filters.set(key, to_str(get(key.as_str())));
    }

    ListQuery {
        page,
        size,
        sort,
        filters,
    }
}

/// [`parse`] over a raw query string, with or without the leading `?`.
pub fn parse_str(query: &str) -> ListQuery {
    let query = query.strip_prefix('?').unwrap_or(query);
    parse(form_urlencoded::parse(query.as_bytes()))
}

/// Minimal URL query pairs for `query`; the default query yields none.
pub fn build(query: &ListQuery) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if query.page != DEFAULT_PAGE {
        out.push(("page".to_string(), query.page.to_string()));
    }
    if query.size != DEFAULT_SIZE {
        out.push(("size".to_string(), query.size.to_string()));
    }
    if let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) {
        out.push(("sort".to_string(), sort.to_string()));
    }
    for (key, value) in query.filters.iter() {
        out.push((key.as_str().to_string(), value.to_string()));
    }
    out
}

/// [`build`] encoded as `application/x-www-form-urlencoded`, without `?`.
pub fn build_string(query: &ListQuery) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(build(query))
        .finish()
}

/// Trimmed, finite number truncated toward zero. Accepts decimal and
/// exponent notation plus unsigned `0x`, `0o` and `0b` literals.
fn to_int(value: Option<&str>) -> Option<f64> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        return None;
    }
    prefixed_int(trimmed)
        .or_else(|| trimmed.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .map(f64::trunc)
}

fn prefixed_int(raw: &str) -> Option<f64> {
    let radix = match raw.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &raw[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .or(Some(f64::NAN))
}

fn to_str(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
