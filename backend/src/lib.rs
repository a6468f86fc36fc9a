//! # Exam Schedule Coordinator
//!
//! Server-side core for scheduling subject exams. Administrators enter exam
//! dates and start/due times in South Africa Standard Time; the coordinator
//! validates them against the business-hours and same-day rules, converts
//! them to UTC and applies them to every stored row of each subject code.
//!
//! ## Architecture
//!
//! - [`models`]: Subject catalog and SAST/UTC conversion
//! - [`db`]: Repository traits, in-memory and Postgres storage
//! - [`services`]: Authorization, validation and the coordinator
//! - [`routes`]: Request and response payloads per operation
//! - [`http`]: Axum server (feature `http-server`)
//! - [`config`]: Server configuration file

// RepositoryError carries structured context
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
