//! Digest email rendering and research links.

pub mod email;
pub mod links;

pub use email::{digest_subject, digest_title, render_digest, RenderedEmail};
pub use links::{research_links, ResearchLink};
