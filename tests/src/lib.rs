//! # Catapult Core Test Suite
//!
//! Cross-crate flows driven through the full plugin stack.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # signing keys, transaction builders, chain setup
//! └── integration/      # flows across model, validators, observers and pipeline
//!     ├── determinism.rs
//!     ├── fee_flows.rs
//!     ├── aggregate_flows.rs
//!     ├── lock_flows.rs
//!     ├── resolver_purity.rs
//!     ├── rollback_symmetry.rs
//!     └── chain_flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::rollback_symmetry
//!
//! # Benchmarks
//! cargo bench -p cc-tests
//! ```

pub mod fixtures;
pub mod integration;
