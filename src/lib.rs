// src/lib.rs

//! sitewatch: detect new events and content changes on monitored web pages.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
