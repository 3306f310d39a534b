//! End-to-end client flows against [`crate::fixtures::InMemoryNode`].

pub mod flows;
