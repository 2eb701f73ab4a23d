//! Common utilities and shared types for scribe.
//!
//! This crate provides foundational components used across all scribe crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Page Cache**: Redis-backed short-TTL caching of rendered responses

pub mod config;
pub mod error;
pub mod id;
pub mod page_cache;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use page_cache::{PAGE_CACHE_TTL_SECS, PageCache, PageCacheError, ResponseCache};
