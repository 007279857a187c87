//! # cc-01-cache
//!
//! Transactional state cache for block processing.
//!
//! ## Model
//!
//! - **CatapultCache**: fixed set of typed sub-caches plus the committed
//!   height. Sub-caches are registered once through [`CatapultCacheBuilder`].
//! - **CatapultCacheDelta**: single-writer overlay used while one block is
//!   processed. Only one delta may be outstanding at a time.
//! - **CatapultCacheView**: immutable snapshot. A view never observes a
//!   commit that happened after it was created.
//!
//! ```text
//!   create_delta() ──► [delta overlay] ──observers──► commit(delta, height)
//!                                                          │
//!   create_view()  ──► [Arc<CommittedState>] ◄─────atomic swap┘
//! ```
//!
//! Sub-caches are addressed by descriptor type (`sub::<D>()`), never by name.

pub mod catapult_cache;
pub mod delta;
pub mod domain;
pub mod read_only;

mod storage;

pub use catapult_cache::{CatapultCache, CatapultCacheBuilder, CatapultCacheDelta, CatapultCacheView};
pub use delta::BasicCacheDelta;
pub use domain::*;
pub use read_only::{ReadOnlyCatapultCache, ReadOnlySubCache};
