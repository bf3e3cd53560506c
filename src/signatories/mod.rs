//! Signatory registry - officials referenced by the "Prepared by" /
//! "Submitted by" blocks on generated documents.

pub mod handlers;
pub mod model;
