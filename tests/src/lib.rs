//! # Arkiv Client Test Suite
//!
//! End-to-end tests that drive the public clients against an in-memory node.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures/      # InMemoryNode: mines blocks, stores entities, serves logs and queries
//! │   └── integration/   # Client flows, blocking and async
//! └── benches/           # Codec hot paths (criterion)
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p arkiv-tests
//!
//! # By category
//! cargo test -p arkiv-tests integration::flows
//! cargo test -p arkiv-tests integration::async_flows
//!
//! # Benchmarks
//! cargo bench -p arkiv-tests
//! ```

pub mod fixtures;
pub mod integration;
