//! Audio DSP Pipeline Control Plane
//!
//! A `no_std`, `no_alloc` control-plane core for audio DSP firmware: the
//! component lifecycle state machine and the DMA controller allocation
//! policy, the two arbiters that gate glitch-free operation of a pipeline
//! running without an OS-level scheduler.
//!
//! # Architecture
//!
//! Two independent control surfaces, invoked by higher-level
//! pipeline-management code and never by each other:
//!
//! 1. **Component Lifecycle** ([`component`]): each processing node owns a
//!    [`ComponentDevice`] whose state advances through a fixed transition
//!    table in response to [`Trigger`] commands (start, stop, pause,
//!    xrun recovery, reset, prepare).
//! 2. **DMA Arbitration** ([`dma`]): a build-time-sized [`DmaPool`] of
//!    controller descriptors, filtered by direction/capability/device
//!    masks and picked under exclusive or shared access discipline.
//!
//! Supporting modules: [`error`] (domain errors + unified wrapper),
//! [`notify`] (general-purpose event notifiers, carrying clock
//! frequency-change data), and `sync` (ISR-safe wrappers, behind the
//! `critical-section` feature).
//!
//! Both cores are synchronous, non-yielding, bounded-time computations -
//! safe to call from interrupt context. Neither performs locking; see the
//! module docs for the exact concurrency contracts.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and sparse trace
//!   diagnostics
//! - `critical-section`: Enable the ISR-safe `sync` wrappers
//!
//! # Example
//!
//! ```
//! use adsp_pipectl::{
//!     AccessMode, ComponentDevice, ComponentState, DmaController, DmaPool, Trigger,
//! };
//! use adsp_pipectl::dma::{DMA_CAP_GP_LP, DMA_DEV_SSP, DMA_DIR_MEM_TO_DEV};
//!
//! // Platform init: describe the physical engines once, for the image lifetime.
//! static DMACS: DmaPool<2> = DmaPool::new([
//!     DmaController::new(0, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP, DMA_DEV_SSP),
//!     DmaController::new(1, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP, DMA_DEV_SSP),
//! ]);
//!
//! // Pipeline bring-up: walk a node to active.
//! let mut node = ComponentDevice::new();
//! node.trigger(Trigger::Reset)?;
//! node.trigger(Trigger::Prepare)?;
//! node.trigger(Trigger::Start)?;
//! assert_eq!(node.state(), ComponentState::Active);
//!
//! // Pick an engine for its playback stream; channel acquisition happens
//! // elsewhere, and may race - re-select if it does.
//! let engine = DMACS
//!     .select(DMA_DIR_MEM_TO_DEV, 0, DMA_DEV_SSP, AccessMode::Exclusive)
//!     .expect("both engines idle");
//! assert_eq!(engine.id(), 0);
//! # Ok::<(), adsp_pipectl::ComponentError>(())
//! ```

#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]
// Clippy lint levels live here; the full policy is in Cargo.toml [lints].
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod component;
pub mod dma;
pub mod error;
pub mod notify;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use component::{ComponentDevice, ComponentState, Trigger};
pub use dma::{AccessMode, DmaController, DmaPool};
pub use error::{
    ComponentError, ComponentResult, DmaError, DmaResult, Error, NotifyError, NotifyResult, Result,
};
pub use notify::{
    CLOCK_NOTIFY_POST, CLOCK_NOTIFY_PRE, ClockNotifyData, Notifier, NotifierHandle,
    NotifierRegistry,
};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::{CriticalSectionCell, SharedComponent};
