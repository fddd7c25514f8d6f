//! IGDB metadata client
//!
//! Wraps the IGDB v4 API behind a small query builder, a Twitch app-token
//! cache that coalesces concurrent refreshes, and a request executor that
//! classifies every failure into [`igdb::ApiError`].

pub mod config;
pub mod igdb;
pub mod logging;
pub mod time;

#[cfg(test)]
mod testutil;

pub use config::{ConfigError, Credentials, IgdbConfig};
pub use igdb::{
    image_url, ApiClient, ApiError, ApiRequest, ApiResult, Franchise, Game, ImageSize,
    QueryBuilder, RetryPolicy, Screenshot, SortDirection, TimeToBeat, TokenManager,
};
