pub mod bodystream;
pub mod contenttypes;
pub mod exchange;

// Re-exports for convenience
pub use bodystream::{BodyStream, ChunkTransform};
pub use contenttypes::{ContentClassifier, ContentTypes};
pub use exchange::{ClientRedirect, ProxyExchange};
