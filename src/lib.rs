pub mod artist;
pub mod config;
pub mod db;
pub mod environment;
pub mod errors;
pub mod form;
pub mod genres;
pub mod normalization;
pub mod routes;
pub mod sample;
pub mod schedule;
pub mod search;
pub mod show;
pub mod urls;
pub mod venue;

/// A record ID, assigned by the store.
pub type Id = i32;
