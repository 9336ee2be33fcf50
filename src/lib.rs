//! Car dealership reviews: dealer listings and reviews fetched from remote cloud
//! functions, enriched with a sentiment label, next to a local make/model catalog.

pub mod api;
pub mod auth;
pub mod cloud;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod remote;
pub mod sentiment;
