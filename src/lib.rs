//! The library code for the `postgen` blog post generator. Publishing a post
//! is broken down into two distinct steps:
//!
//! 1. Collecting the raw form fields from some front-end ([`crate::collect`])
//! 2. Publishing the fields as a post ([`crate::publish`])
//!
//! The second step does the real work. It validates the fields, loads the
//! existing index file ([`crate::index`]), assigns the next post id, renders
//! the post's HTML page from a fixed template ([`crate::render`]), writes the
//! page to the output folder and finally rewrites the index with the new
//! [`post::PostRecord`] appended.
//!
//! Nothing here locks the index file. The tool is meant for a single operator
//! publishing one post at a time.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod collect;
pub mod config;
pub mod index;
pub mod post;
pub mod publish;
pub mod render;
