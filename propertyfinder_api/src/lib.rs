mod client;
mod errors;
mod headers;
mod retry;
pub mod types;
mod user_agent;
pub use self::client::Client;
pub use self::errors::{Error, FailureKind};
pub use self::headers::{referer_for, request_headers};
pub use self::retry::{
    request_timeout_from_env, request_timeout_from_vars, with_retry, RetryPolicy,
    DEFAULT_BACKOFF_UNIT, DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT,
};
pub use self::user_agent::get_user_agent;
