pub mod observability;
pub mod rate_limit;

pub use observability::observe;
pub use rate_limit::{rate_limit, RateLimiter};
