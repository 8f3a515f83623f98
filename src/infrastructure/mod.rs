pub mod auth;
pub mod image;
pub mod observability;
pub mod persistence;
pub mod queue;
