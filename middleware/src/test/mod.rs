//! Unit test module
//!
//! Middleware unit tests live here, separate from source files.
//! Tests interact with the middleware via public and pub(crate) APIs.

mod support;
