//! Integration Tests Module
//!
//! End-to-end coverage over an in-memory database: the generation chain
//! from topic to published HTML (with a stubbed backend), template store
//! behavior, and the directory import flow.

// Topic → titles → article → html chain tests
mod chain_test;

// Template store, resolution and import tests
mod templates_test;
