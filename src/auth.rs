//! Auth-domain primitives: redacted token secrets, challenge classification, and token
//! extraction from GoodData response bodies.

pub mod challenge;
pub mod secret;
pub mod token;

pub use challenge::*;
pub use secret::*;
pub use token::*;

/// Request header carrying the super-secure token on token endpoint calls.
pub const SST_HEADER: &str = "X-GDC-AuthSST";
/// Request header carrying the temporary token on every API call.
pub const TT_HEADER: &str = "X-GDC-AuthTT";
