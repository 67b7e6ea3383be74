//! # Hella Testkit
//!
//! Testing utilities for Hella.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known soft hashes, object encodings and pointers for cross-implementation checks
//! - **Generators**: Proptest strategies for values, flat objects and records
//! - **Fixtures**: Quote records for integration tests and benchmarks
//!
//! ## Golden Vectors
//!
//! ```rust
//! use hella_testkit::vectors::verify_all_vectors;
//!
//! for (name, ok) in verify_all_vectors() {
//!     assert!(ok, "{} mismatched", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use hella_testkit::generators::value;
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(v in value()) {
//!         let bytes = hella_core::encode(&v);
//!         prop_assert_eq!(hella_core::decode(&bytes, 0).unwrap().0, v);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use hella_testkit::fixtures::QuoteFixture;
//!
//! let fixture = QuoteFixture::new(4);
//! assert_eq!(fixture.encoded().len(), 4);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{quote, QuoteFixture};
pub use vectors::{all_vectors, hash_vectors, verify_all_vectors, GoldenVector, HashVector};
