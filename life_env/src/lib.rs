//! Sparse Life Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" seam between the simulation engine and
//! everything it touches outside of memory:
//! - Time (`now()`, `sleep()`) for the snapshot cadence
//! - Persistence (`PatternStore`) for dense occupancy arrays
//! - Rendering (`FrameRenderer`) for scatter images
//!
//! The harness runs the same loop against the production Tokio clock or a
//! virtual clock, and against a real bucket or an in-memory one.
//!
//! # Example
//!
//! ```ignore
//! use life_env::{LifeContext, PatternStore};
//!
//! async fn frame_loop<Ctx: LifeContext>(ctx: &Ctx, store: &dyn PatternStore) {
//!     loop {
//!         let occupancy = capture();
//!         let _ = store.put_pattern("pattern_block", &occupancy).await;
//!         ctx.sleep(Duration::from_secs(1)).await;
//!     }
//! }
//! ```

mod context;
mod error;
mod render;
mod store;
mod tokio_impl;
mod types;

pub use context::LifeContext;
pub use error::EnvError;
pub use render::FrameRenderer;
pub use store::{object_key, PatternStore};
pub use tokio_impl::TokioContext;
pub use types::{Occupancy, RunId, ScatterFrame};
