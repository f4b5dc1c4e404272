pub mod auth;
pub mod command;
pub mod context;
pub mod error;
pub mod query;
