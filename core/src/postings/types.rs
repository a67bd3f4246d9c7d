//! Posting DTOs and their closed enumerations.
//!
//! # Design
//! Enumerations are closed Rust enums so a posting held by the client can
//! never carry a value outside the allowed set. Wire names are kept in
//! `as_str`, display labels in `label`. Create attributes require every
//! enumeration; update attributes are a partial copy of them.

use serde::{Deserialize, Serialize};

use crate::jsonapi::{Document, Resource};

/// JSON:API resource type for postings.
pub const POSTINGS_TYPE: &str = "postings";

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($wire:literal, $label:literal),)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Value as sent to and received from the backend.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Human-readable label.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn from_wire(value: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

wire_enum! {
    /// Job board the posting was found on.
    pub enum Source {
        LinkedIn => ("LinkedIn", "LinkedIn"),
        Indeed => ("Indeed", "Indeed"),
        Jobboom => ("Jobboom", "Jobboom"),
        Jobillico => ("Jobillico", "Jobillico"),
        JobBank => ("JobBank", "Job Bank"),
        Other => ("Other", "Other"),
    }
}

wire_enum! {
    pub enum EmploymentType {
        FullTime => ("full_time", "Full-time"),
        PartTime => ("part_time", "Part-time"),
        Contract => ("contract", "Contract"),
        Internship => ("internship", "Internship"),
        Temporary => ("temporary", "Temporary"),
    }
}

wire_enum! {
    pub enum WorkMode {
        InOffice => ("in_office", "On-site"),
        Remote => ("remote", "Remote"),
        Hybrid => ("hybrid", "Hybrid"),
    }
}

wire_enum! {
    /// Where the application stands.
    pub enum PostingStatus {
        New => ("new", "New"),
        Postulated => ("postulated", "Postulated"),
        InterviewScheduled => ("interview_scheduled", "Interview scheduled"),
        InterviewDropped => ("interview_dropped", "Interview dropped"),
        InterviewRejected => ("interview_rejected", "Interview rejected"),
        Rejected => ("rejected", "Rejected"),
        Dropped => ("dropped", "Dropped"),
        JobAccepted => ("job_accepted", "Job accepted"),
        JobRefused => ("job_refused", "Job refused"),
    }
}

/// Attributes of a posting as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingAttributes {
    pub user_id: u64,
    pub source: Source,
    pub source_id: String,
    pub employment_type: EmploymentType,
    pub work_mode: WorkMode,
    pub status: PostingStatus,
    pub url: String,
    pub company: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Attributes required to create a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingCreate {
    pub source: Source,
    pub source_id: String,
    pub employment_type: EmploymentType,
    pub work_mode: WorkMode,
    pub status: PostingStatus,
    pub url: String,
    pub company: String,
    pub title: String,
    pub description: String,
    pub cover_letter: Option<String>,
}

/// Partial update; only present fields are sent.
///
/// `cover_letter` is doubly optional: `Some(None)` clears it on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<EmploymentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_mode: Option<WorkMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<Option<String>>,
}

impl From<PostingCreate> for PostingUpdate {
    fn from(c: PostingCreate) -> Self {
        Self {
            source: Some(c.source),
            source_id: Some(c.source_id),
            employment_type: Some(c.employment_type),
            work_mode: Some(c.work_mode),
            status: Some(c.status),
            url: Some(c.url),
            company: Some(c.company),
            title: Some(c.title),
            description: Some(c.description),
            cover_letter: Some(c.cover_letter),
        }
    }
}

/// Server-computed pagination summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub from: Option<u64>,
    pub last_page: u32,
    pub per_page: u32,
    pub to: Option<u64>,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingsListMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageMeta>,
}

pub type PostingResource = Resource<PostingAttributes>;
pub type PostingsListResponse = Document<Vec<PostingResource>, PostingsListMeta>;
pub type PostingShowResponse = Document<PostingResource>;
