pub mod aggregate_flows;
pub mod chain_flows;
pub mod determinism;
pub mod fee_flows;
pub mod lock_flows;
pub mod resolver_purity;
pub mod rollback_symmetry;
