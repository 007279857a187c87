//! Driven ports of the chain service.

pub mod outbound;

pub use outbound::FinalizationSink;
