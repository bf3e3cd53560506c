//! CAV form records - models, validation, change-diff, and the lifecycle
//! handlers that orchestrate create/update/archive/restore/delete.

pub mod diff;
pub mod handlers;
pub mod models;
pub mod validation;
