use std::{cmp::Ordering, collections::HashMap};

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::{check_envelope, json_api, now, ApiError, AppState, Document, Envelope, Resource};

const POSTINGS: &str = "postings";

const SOURCES: &[&str] = &["LinkedIn", "Indeed", "Jobboom", "Jobillico", "JobBank", "Other"];
const EMPLOYMENT_TYPES: &[&str] = &["full_time", "part_time", "contract", "internship", "temporary"];
const WORK_MODES: &[&str] = &["in_office", "remote", "hybrid"];
const STATUSES: &[&str] = &[
    "new",
    "postulated",
    "interview_scheduled",
    "interview_dropped",
    "interview_rejected",
    "rejected",
    "dropped",
    "job_accepted",
    "job_refused",
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostingAttributes {
    pub user_id: u64,
    pub source: String,
    pub source_id: String,
    pub employment_type: String,
    pub work_mode: String,
    pub status: String,
    pub url: String,
    pub company: String,
    pub title: String,
    pub description: String,
    pub cover_letter: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug)]
pub struct Posting {
    pub id: String,
    pub attributes: PostingAttributes,
}

impl Posting {
    fn resource(&self) -> Resource<PostingAttributes> {
        Resource {
            kind: POSTINGS.to_string(),
            id: self.id.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Attributes as received on create and update; every field optional so
/// validation can report what is missing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingInput {
    pub source: Option<String>,
    pub source_id: Option<String>,
    pub employment_type: Option<String>,
    pub work_mode: Option<String>,
    pub status: Option<String>,
    pub url: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub cover_letter: Option<Option<String>>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub from: Option<usize>,
    pub last_page: u32,
    pub per_page: u32,
    pub to: Option<usize>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListMeta {
    pub page: PageMeta,
}

pub async fn list_postings(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let number = params
        .get("page[number]")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    let size = params
        .get("page[size]")
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(25)
        .clamp(1, state.settings.max_page_size);

    let store = state.db.read().await;
    let mut matches: Vec<&Posting> = store
        .postings
        .iter()
        .filter(|p| matches_filters(&p.attributes, &params))
        .collect();

    if let Some(sort) = params.get("sort").filter(|s| !s.trim().is_empty()) {
        let keys = parse_sort(sort)?;
        matches.sort_by(|a, b| compare(&a.attributes, &b.attributes, &keys));
    }

    let total = matches.len();
    let per_page = size as usize;
    let last_page = total.div_ceil(per_page).max(1) as u32;
    let offset = (number as usize - 1).saturating_mul(per_page);
    let data: Vec<_> = matches
        .iter()
        .skip(offset)
        .take(per_page)
        .map(|p| p.resource())
        .collect();
    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(offset + 1), Some(offset + data.len()))
    };

    tracing::debug!(total, number, size, "listing postings");
    let doc = Document {
        data,
        meta: Some(ListMeta {
            page: PageMeta {
                current_page: number,
                from,
                last_page,
                per_page: size,
                to,
                total,
            },
        }),
    };
    Ok(json_api(StatusCode::OK, doc))
}

pub async fn get_posting(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response, ApiError> {
    let store = state.db.read().await;
    let posting = store
        .postings
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(&id))?;
    Ok(json_api(StatusCode::OK, Document::<_, ()> {
        data: posting.resource(),
        meta: None,
    }))
}

pub async fn create_posting(
    State(state): State<AppState>,
    body: Result<Json<Envelope<PostingInput>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(envelope) = body?;
    check_envelope(&envelope.data, POSTINGS, None)?;
    let input = envelope.data.attributes;

    let timestamp = now();
    let mut store = state.db.write().await;
    let attributes = PostingAttributes {
        user_id: store.profile.id.parse().unwrap_or(1),
        source: one_of("source", input.source, SOURCES)?,
        source_id: required("sourceId", input.source_id)?,
        employment_type: one_of("employmentType", input.employment_type, EMPLOYMENT_TYPES)?,
        work_mode: one_of("workMode", input.work_mode, WORK_MODES)?,
        status: one_of("status", input.status, STATUSES)?,
        url: required("url", input.url)?,
        company: non_blank("Company", input.company)?,
        title: non_blank("Title", input.title)?,
        description: required("description", input.description)?,
        cover_letter: input.cover_letter.flatten(),
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };
    let posting = Posting {
        id: Uuid::new_v4().to_string(),
        attributes,
    };
    store.postings.push(posting.clone());
    tracing::info!(id = %posting.id, "posting created");

    Ok(json_api(StatusCode::CREATED, Document::<_, ()> {
        data: posting.resource(),
        meta: None,
    }))
}

pub async fn update_posting(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Envelope<PostingInput>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(envelope) = body?;
    check_envelope(&envelope.data, POSTINGS, Some(&id))?;
    let input = envelope.data.attributes;

    let mut store = state.db.write().await;
    let posting = store
        .postings
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| not_found(&id))?;

    // Validate everything before touching the stored record.
    let mut next = posting.attributes.clone();
    if input.source.is_some() {
        next.source = one_of("source", input.source, SOURCES)?;
    }
    if input.employment_type.is_some() {
        next.employment_type = one_of("employmentType", input.employment_type, EMPLOYMENT_TYPES)?;
    }
    if input.work_mode.is_some() {
        next.work_mode = one_of("workMode", input.work_mode, WORK_MODES)?;
    }
    if input.status.is_some() {
        next.status = one_of("status", input.status, STATUSES)?;
    }
    if input.company.is_some() {
        next.company = non_blank("Company", input.company)?;
    }
    if input.title.is_some() {
        next.title = non_blank("Title", input.title)?;
    }
    if let Some(source_id) = input.source_id {
        next.source_id = source_id;
    }
    if let Some(url) = input.url {
        next.url = url;
    }
    if let Some(description) = input.description {
        next.description = description;
    }
    if let Some(cover_letter) = input.cover_letter {
        next.cover_letter = cover_letter;
    }
    next.updated_at = now();
    posting.attributes = next;

    Ok(json_api(StatusCode::OK, Document::<_, ()> {
        data: posting.resource(),
        meta: None,
    }))
}

fn not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Posting {id} does not exist."))
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    value.ok_or_else(|| ApiError::invalid(format!("{field} is required")))
}

fn non_blank(label: &str, value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::invalid(format!("{label} required")))
}

fn one_of(field: &str, value: Option<String>, allowed: &[&str]) -> Result<String, ApiError> {
    let value = required(field, value)?;
    if allowed.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(ApiError::invalid(format!(
            "{field} must be one of: {}",
            allowed.join(", ")
        )))
    }
}

fn matches_filters(a: &PostingAttributes, params: &HashMap<String, String>) -> bool {
    let filter = |key: &str| {
        params
            .get(&format!("filter[{key}]"))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };
    let contains = |haystack: &str, needle: &str| haystack.to_lowercase().contains(&needle.to_lowercase());

    filter("company").map_or(true, |v| contains(&a.company, v))
        && filter("title").map_or(true, |v| contains(&a.title, v))
        && filter("employmentType").map_or(true, |v| a.employment_type == v)
        && filter("source").map_or(true, |v| a.source == v)
        && filter("workMode").map_or(true, |v| a.work_mode == v)
        && filter("status").map_or(true, |v| a.status == v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortField {
    Company,
    Title,
    Status,
    Source,
    CreatedAt,
    UpdatedAt,
}

/// `sort=-createdAt,company` style list; leading `-` means descending.
fn parse_sort(raw: &str) -> Result<Vec<(SortField, bool)>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|token| {
            let (descending, name) = match token.strip_prefix('-') {
                Some(name) => (true, name),
                None => (false, token),
            };
            let field = match name {
                "company" => SortField::Company,
                "title" => SortField::Title,
                "status" => SortField::Status,
                "source" => SortField::Source,
                "createdAt" => SortField::CreatedAt,
                "updatedAt" => SortField::UpdatedAt,
                other => {
                    return Err(ApiError::new(
                        StatusCode::BAD_REQUEST,
                        "Invalid sort",
                        format!("Unsupported sort field '{other}'."),
                    ))
                }
            };
            Ok((field, descending))
        })
        .collect()
}

fn compare(a: &PostingAttributes, b: &PostingAttributes, keys: &[(SortField, bool)]) -> Ordering {
    keys.iter()
        .map(|(field, descending)| {
            let ordering = match field {
                SortField::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
                SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                SortField::Status => a.status.cmp(&b.status),
                SortField::Source => a.source.cmp(&b.source),
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };
            if *descending {
                ordering.reverse()
            } else {
                ordering
            }
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}
