//! HTTP/1.1 protocol layer.
//!
//! - **`connection`**: per-connection state machine and the [`Handler`] trait
//! - **`parser`**: decodes request heads from raw byte buffers
//! - **`request`**: decoded request representation
//! - **`response`**: status table and response representation with builder
//! - **`headers`**: case-insensitive header map and key canonicalization
//! - **`writer`**: response encoding and chunked writing
//! - **`mime`**: MIME type lookup by file extension
//!
//! # Connection State Machine
//!
//! Every connection carries exactly one request:
//!
//! ```text
//!        ┌─────────────┐
//!        │  Handling   │ ← Handler reads the request, writes the response
//!        └──────┬──────┘
//!               │ error          ┌──────────────┐
//!               ├───────────────▶│    Failed    │ ← Best-effort 500
//!               │ ok             └──────┬───────┘
//!               ▼                       │
//!        ┌─────────────┐                │
//!        │   Closing   │◀───────────────┘
//!        └──────┬──────┘
//!               ▼
//!            Closed
//! ```

pub mod connection;
pub mod headers;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

pub use connection::{Connection, Handler};
pub use headers::{Headers, canonicalize_header_key};
pub use parser::{decode_request, find_headers_end};
pub use request::{Method, Request, RequestLine};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use writer::{ResponseWriter, encode_response};
