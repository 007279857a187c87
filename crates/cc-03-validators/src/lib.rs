//! # cc-03-validators
//!
//! Validation stage of the pipeline.
//!
//! ```text
//! notification ──► AggregateStatelessValidator ──► AggregateStatefulValidator
//!                  (pure rules)                    (ValidatorContext: height,
//!                                                   block time, read-only cache,
//!                                                   resolvers)
//! ```
//!
//! Only notifications whose channel includes the validator channel are
//! dispatched. Every chain stops at the first failure and reports the worst
//! severity seen so far.

pub mod aggregate;
pub mod configured;
pub mod context;
pub mod core;
pub mod validator;

pub use aggregate::{
    aggregate_results, AggregateStatefulValidator, AggregateStatelessValidator,
    DemuxStatefulValidatorBuilder, DemuxStatelessValidatorBuilder, NotificationValidator,
};
pub use configured::Configured;
pub use context::ValidatorContext;
pub use validator::{
    stateful, stateless, FunctionalStatefulValidator, FunctionalStatelessValidator,
    StatefulValidator, StatelessValidator,
};
