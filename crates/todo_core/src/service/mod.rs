//! Core use-case services.
//!
//! # Responsibility
//! - Drive task list transitions and persistence as one session.
//! - Provide the id collaborator sessions are built with; timestamps come
//!   from an injected `mockable::Clock`.

pub mod id_gen;
pub mod task_service;
