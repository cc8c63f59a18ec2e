//! Flutter-facing bindings over `todo_core`.

pub mod api;
