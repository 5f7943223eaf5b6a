//! Transport layer: HTTP and wire-format details (token signing, URL building,
//! response decoding).

mod response;
mod target;
mod token;

pub use response::{decode_api_error, decode_json_at};
pub use target::{PathParams, QueryValues, RequestTarget};
pub use token::{SigningError, issued_at_now, sign_token};
