//! Streaming body transforms.
//!
//! - [`linkscanner`]: routes cross-origin same-site links through the
//!   cookie hand-off
//! - [`metarobots`]: inserts a robots `noindex` tag into HTML
//!
//! Both operate on one chunk at a time and keep their state per response.

pub mod linkscanner;
pub mod metarobots;

pub use linkscanner::LinkRewriter;
pub use metarobots::MetaRobotsInjector;
