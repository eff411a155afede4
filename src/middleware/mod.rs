/// Middleware module
///
/// Per-request tracing spans and the static file server hit counter.

mod hit_counter;
mod request_logger;

pub use hit_counter::{CountHits, HitCounter};
pub use request_logger::{RequestLogger, REQUEST_ID_HEADER};
