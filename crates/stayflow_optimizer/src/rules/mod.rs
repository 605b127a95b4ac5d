pub mod error;
pub mod penalty;
pub mod weight_document;
pub mod weight_rule;
