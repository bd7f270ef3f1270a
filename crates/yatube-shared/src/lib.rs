//! # Yatube Shared
//!
//! Wire types shared by the API server and its clients.
//! Everything here is plain serde data: no I/O, no business rules.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, PaginatedResponse};
