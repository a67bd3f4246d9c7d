//! Job postings: DTOs, list query codec, API operations and state.

pub mod api;
pub mod form;
pub mod query;
pub mod store;
pub mod types;

pub use form::PostingForm;
pub use query::{FilterKey, ListQuery, PostingFilters};
pub use store::{PostingsState, PostingsStore};
pub use types::{
    EmploymentType, PageMeta, PostingAttributes, PostingCreate, PostingResource, PostingStatus, PostingUpdate,
    Source, WorkMode,
};
