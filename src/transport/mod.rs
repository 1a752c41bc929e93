//! HTTP transport used by forecast providers.

mod http;

pub use http::{HttpTransport, TransportError};
