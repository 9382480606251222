//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: one request per connection, only the
//! request line is read, only GET is served.
//!
//! # Architecture
//!
//! - **`connection`**: Per-connection state machine driving one exchange
//! - **`parser`**: Extracts the request line from the bytes first read
//! - **`request`**: Method and request line types
//! - **`response`**: Status codes and the response builder
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: Content type lookup by file extension
//! - **`access_log`**: One log line per answered request
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Single read of up to 4096 bytes
//!        └──────┬──────┘
//!               │ Request line parsed (empty or malformed → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Method gate, resolve, read file
//!        └──────┬───────────┘
//!               │ 200 / 404 / 501 ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response, log it
//!        └──────┬───────────┘
//!               ▼
//!            Closed
//! ```

pub mod access_log;
pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
