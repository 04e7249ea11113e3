//! Port traits defining external boundaries.
//!
//! Each trait is a boundary between the inference core and the outside world
//! (time, identifiers, files, HTTP). Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod http;
pub mod id_gen;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use http::{HttpClient, HttpFuture, HttpResponse};
pub use id_gen::IdGenerator;
