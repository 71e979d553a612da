//! Secret handling utilities.
//!
//! Re-exports secrecy types so callers holding an access token do not need
//! a direct dependency on secrecy.

pub use secrecy::{ExposeSecret, SecretString};
