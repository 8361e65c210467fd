//! Inserts a NOINDEX, NOFOLLOW robots tag into proxied HTML.
//!
//! The tag goes right after the first literal `<head>` of the body, once.
//! Only whole `<head>` tokens inside one chunk are found; a body whose
//! `<head>` is split across chunks, or that has none, passes unmodified.

use crate::http::bodystream::ChunkTransform;
use bytes::{Bytes, BytesMut};

pub const META_ROBOTS_TAG: &str = r#"<meta name="ROBOTS" content="NOINDEX, NOFOLLOW"/>"#;

const HEAD: &[u8] = b"<head>";

#[derive(Debug, Default)]
pub struct MetaRobotsInjector {
    injected: bool,
}

impl MetaRobotsInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn injected(&self) -> bool {
        self.injected
    }
}

impl ChunkTransform for MetaRobotsInjector {
    fn transform(&mut self, chunk: Bytes) -> Bytes {
        if self.injected {
            return chunk;
        }
        let Some(pos) = find(&chunk, HEAD) else {
            return chunk;
        };
        self.injected = true;

        let split = pos + HEAD.len();
        let mut out = BytesMut::with_capacity(chunk.len() + META_ROBOTS_TAG.len() + 1);
        out.extend_from_slice(&chunk[..split]);
        out.extend_from_slice(b"\n");
        out.extend_from_slice(META_ROBOTS_TAG.as_bytes());
        out.extend_from_slice(&chunk[split..]);
        out.freeze()
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
