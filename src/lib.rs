// src/lib.rs

//! Notice bot library: watches a notice feed and reports changes to a
//! chat webhook.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
