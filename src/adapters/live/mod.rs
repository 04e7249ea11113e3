//! Live adapters for real external interactions.

pub mod clock;
pub mod filesystem;
pub mod http;
pub mod id_gen;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use http::LiveHttpClient;
pub use id_gen::LiveIdGenerator;
