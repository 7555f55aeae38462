//! Participant and VR-session lists
//!
//! Lists are fetched whole from the backend; filtering and pagination are
//! done client-side over the fetched rows.

pub mod paging;
pub mod participants;
pub mod sessions;

pub use paging::{PagedList, Paginated};
pub use participants::{fetch_participants, ParticipantFilter};
pub use sessions::fetch_sessions;
