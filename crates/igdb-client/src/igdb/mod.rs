mod client;
mod endpoints;
mod error;
pub mod http;
mod query;
pub mod retry;
mod token;
mod types;

pub use client::{ApiClient, ApiRequest};
pub use error::{ApiError, ApiResult};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use query::{QueryBuilder, SortDirection};
pub use retry::RetryPolicy;
pub use token::TokenManager;
pub use types::*;
