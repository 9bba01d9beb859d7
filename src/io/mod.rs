//! Buffered I/O over raw byte streams.
//!
//! - **`ring`**: fixed-capacity circular byte store with a virtual cursor
//! - **`buffered`**: [`BufferedStream`], a peekable and seekable adapter
//!   over any tokio stream, backed by one ring buffer per direction

pub mod buffered;
pub mod ring;

pub use buffered::{BufferedStream, DEFAULT_CAPACITY};
pub use ring::RingBuffer;
