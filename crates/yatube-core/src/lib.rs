//! # Yatube Core
//!
//! The domain layer of the Yatube API: entities, the access policy,
//! resource serializers and the services that orchestrate them.
//! This crate contains pure business logic with zero infrastructure dependencies;
//! storage and authentication are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod serializers;
pub mod services;

pub use error::{DomainError, FieldErrors};
pub use policy::Actor;
