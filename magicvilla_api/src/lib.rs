//! Client-side plumbing for the MagicVilla API: the result envelope, the
//! outbound request descriptor, and the dispatcher that sends a descriptor
//! and classifies the reply into a caller-chosen type.

mod classify;
mod client;
mod errors;
mod request;
pub mod types;
pub use self::classify::{classify, to_failure_result};
pub use self::client::Client;
pub use self::errors::Error;
pub use self::request::{ApiRequest, ApiType, ContentType, FormFile};
