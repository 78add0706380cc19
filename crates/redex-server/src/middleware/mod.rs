pub mod rate_limit;

pub use rate_limit::{limit_by_client, RateLimiter};
