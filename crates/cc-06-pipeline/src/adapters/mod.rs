//! Adapters implementing the outbound ports.

mod broadcast_sink;

pub use broadcast_sink::BroadcastFinalizationSink;
