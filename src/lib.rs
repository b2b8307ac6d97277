//! Work-time accounting engine for attendance records
//!
//! This crate turns clock-in, mid-day and clock-out events into worked time,
//! classifies each event as office or remote work against a geofence, and
//! aggregates days into monthly and annual statistics with comp-leave
//! balances. It also validates overtime and vacation submissions against the
//! company work policy.

#![warn(missing_docs)]

pub mod api;
pub mod cache;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
