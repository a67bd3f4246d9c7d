//! The signed-in user's profile.

pub mod api;
pub mod store;
pub mod types;

pub use store::{ProfileState, ProfileStore};
pub use types::{ProfileAttributes, ProfileForm, ProfileResource, ProfileUpdate};
