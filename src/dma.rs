//! DMA controller pool and allocation policy
//!
//! Platform initialization describes each physical DMA engine with a
//! [`DmaController`] and collects them into a [`DmaPool`], a fixed-size
//! array sized at build time. Pipeline code asks the pool for an engine
//! matching a transfer request via [`DmaPool::select`]; the pool only
//! *identifies* a controller - channel acquisition is a separate operation
//! owned by the channel-management layer.
//!
//! # Selection policy
//!
//! Requests filter on transfer direction, capabilities and peripheral
//! device type (zero means "don't care"), then pick by [`AccessMode`]:
//!
//! - [`Exclusive`](AccessMode::Exclusive): first candidate in pool order
//!   with no busy channels. No fallback - if every candidate is busy, the
//!   request reports no controller available.
//! - [`Shared`](AccessMode::Shared): candidate with the fewest busy
//!   channels; ties go to the earliest in pool order.
//!
//! # Concurrency
//!
//! The pool is read-mostly: descriptors are never mutated after
//! initialization except for the busy channel counter, which the channel
//! layer updates atomically from other execution contexts. The scan takes
//! no locks; a selection result is therefore a hint - the chosen
//! controller's busy count may change before the caller acquires a
//! channel, and callers must re-select on an acquisition race.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::{DmaError, DmaResult};

// =============================================================================
// Request Masks
// =============================================================================

/// Transfer direction: memory to memory
pub const DMA_DIR_MEM_TO_MEM: u32 = 1 << 0;
/// Transfer direction: memory to peripheral device
pub const DMA_DIR_MEM_TO_DEV: u32 = 1 << 1;
/// Transfer direction: peripheral device to memory
pub const DMA_DIR_DEV_TO_MEM: u32 = 1 << 2;
/// Transfer direction: peripheral device to peripheral device
pub const DMA_DIR_DEV_TO_DEV: u32 = 1 << 3;

/// Capability: HD-Audio link transfers
pub const DMA_CAP_HDA_LINK: u32 = 1 << 0;
/// Capability: general purpose, low power
pub const DMA_CAP_GP_LP: u32 = 1 << 1;
/// Capability: general purpose, high performance
pub const DMA_CAP_GP_HP: u32 = 1 << 2;

/// Device type: host page table transfers
pub const DMA_DEV_HOST: u32 = 1 << 0;
/// Device type: PCM stream
pub const DMA_DEV_PCM: u32 = 1 << 1;
/// Device type: wave capture/playback
pub const DMA_DEV_WAV: u32 = 1 << 2;
/// Device type: SSP serial port
pub const DMA_DEV_SSP: u32 = 1 << 3;
/// Device type: digital microphone
pub const DMA_DEV_DMIC: u32 = 1 << 4;

// =============================================================================
// Access Mode
// =============================================================================

/// Access discipline for controller selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccessMode {
    /// Require a controller with no channels currently in use
    Exclusive,
    /// Accept the least-loaded matching controller
    Shared,
}

// =============================================================================
// Controller Descriptor
// =============================================================================

/// Descriptor for one physical DMA engine.
///
/// The static fields (`id` and the support masks) are fixed at platform
/// initialization. The busy channel counter is the only mutable field; it
/// is maintained by the channel-management layer through
/// [`channel_started`](Self::channel_started) /
/// [`channel_stopped`](Self::channel_stopped) and read atomically by the
/// selection scan.
#[derive(Debug)]
pub struct DmaController {
    /// Stable identifier for diagnostics
    id: u32,
    /// Supported transfer directions (`DMA_DIR_*`)
    dirs: u32,
    /// Supported capabilities (`DMA_CAP_*`)
    caps: u32,
    /// Supported peripheral device types (`DMA_DEV_*`)
    devs: u32,
    /// Channels currently running a transfer
    busy_channels: AtomicU32,
}

impl DmaController {
    /// Create a descriptor with no busy channels (const, suitable for
    /// static pool initialization).
    #[must_use]
    pub const fn new(id: u32, dirs: u32, caps: u32, devs: u32) -> Self {
        Self {
            id,
            dirs,
            caps,
            devs,
            busy_channels: AtomicU32::new(0),
        }
    }

    /// Stable identifier of this engine
    #[inline(always)]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Supported transfer direction mask
    #[inline(always)]
    #[must_use]
    pub const fn dirs(&self) -> u32 {
        self.dirs
    }

    /// Supported capability mask
    #[inline(always)]
    #[must_use]
    pub const fn caps(&self) -> u32 {
        self.caps
    }

    /// Supported peripheral device type mask
    #[inline(always)]
    #[must_use]
    pub const fn devs(&self) -> u32 {
        self.devs
    }

    /// Number of channels currently running a transfer.
    ///
    /// Acquire load: a selection observes counts no older than the last
    /// published channel stop. The value is a snapshot and may change
    /// immediately after the read.
    #[inline]
    #[must_use]
    pub fn busy_channels(&self) -> u32 {
        self.busy_channels.load(Ordering::Acquire)
    }

    /// Whether no channel is currently running a transfer
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.busy_channels() == 0
    }

    /// Record a channel starting a transfer.
    ///
    /// Called by the channel-management layer, never by the selection scan.
    #[inline]
    pub fn channel_started(&self) {
        self.busy_channels.fetch_add(1, Ordering::AcqRel);
    }

    /// Record a channel finishing a transfer.
    ///
    /// Called by the channel-management layer. Saturates at zero; a stop
    /// without a matching start is ignored rather than wrapping the
    /// counter.
    #[inline]
    pub fn channel_stopped(&self) {
        let _ = self
            .busy_channels
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
    }

    /// Whether this controller passes every active filter of a request.
    ///
    /// A zero request field means "don't care"; a non-zero field requires
    /// a non-empty intersection with the corresponding support mask.
    fn matches(&self, dirs: u32, caps: u32, devs: u32) -> bool {
        (dirs == 0 || self.dirs & dirs != 0)
            && (caps == 0 || self.caps & caps != 0)
            && (devs == 0 || self.devs & devs != 0)
    }
}

// =============================================================================
// Controller Pool
// =============================================================================

/// Fixed pool of DMA controller descriptors.
///
/// Owned by the platform-initialization context for the lifetime of the
/// firmware image; never resized. The constructor is `const` so the pool
/// can be a `static`.
///
/// # Example
///
/// ```
/// use adsp_pipectl::dma::{
///     AccessMode, DmaController, DmaPool, DMA_CAP_GP_LP, DMA_DEV_SSP, DMA_DIR_MEM_TO_DEV,
/// };
///
/// static POOL: DmaPool<2> = DmaPool::new([
///     DmaController::new(0, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP, DMA_DEV_SSP),
///     DmaController::new(1, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP, DMA_DEV_SSP),
/// ]);
///
/// let engine = POOL
///     .select(DMA_DIR_MEM_TO_DEV, 0, DMA_DEV_SSP, AccessMode::Shared)
///     .unwrap();
/// assert_eq!(engine.id(), 0);
/// ```
#[derive(Debug)]
pub struct DmaPool<const N: usize> {
    controllers: [DmaController; N],
}

impl<const N: usize> DmaPool<N> {
    /// Create a pool from an array of descriptors (const, suitable for
    /// static initialization).
    #[must_use]
    pub const fn new(controllers: [DmaController; N]) -> Self {
        Self { controllers }
    }

    /// Number of controllers in the pool
    #[inline(always)]
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the pool holds no controllers
    #[inline(always)]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Get a controller by pool index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&DmaController> {
        self.controllers.get(index)
    }

    /// Iterate over all controllers in pool order
    pub fn controllers(&self) -> impl Iterator<Item = &DmaController> {
        self.controllers.iter()
    }

    /// Select a controller for a transfer request.
    ///
    /// `dirs`, `caps` and `devs` filter the pool (zero means "don't
    /// care"); `access` picks among the candidates as described in the
    /// module docs. Returns `None` when no candidate passes filtering, or
    /// in exclusive mode when no candidate is idle - an expected outcome
    /// under hardware contention, not an error.
    ///
    /// No side effects on the pool; the result only identifies a
    /// controller and transfers no channel ownership.
    #[must_use]
    pub fn select(
        &self,
        dirs: u32,
        caps: u32,
        devs: u32,
        access: AccessMode,
    ) -> Option<&DmaController> {
        let chosen = match access {
            AccessMode::Exclusive => self.select_exclusive(dirs, caps, devs),
            AccessMode::Shared => self.select_shared(dirs, caps, devs),
        };

        #[cfg(feature = "defmt")]
        if let Some(controller) = chosen {
            defmt::trace!("dma select: controller {}", controller.id());
        }

        chosen
    }

    /// Error-propagating form of [`select`](Self::select).
    ///
    /// For pipeline paths that surface exhaustion as an error instead of
    /// handling it inline.
    pub fn request(
        &self,
        dirs: u32,
        caps: u32,
        devs: u32,
        access: AccessMode,
    ) -> DmaResult<&DmaController> {
        self.select(dirs, caps, devs, access)
            .ok_or(DmaError::NoControllerAvailable)
    }

    /// First candidate in pool order with no busy channels.
    ///
    /// No least-busy fallback: a busy candidate is skipped, not
    /// remembered, and the request fails outright when no candidate is
    /// idle. Callers depend on that failure behavior.
    fn select_exclusive(&self, dirs: u32, caps: u32, devs: u32) -> Option<&DmaController> {
        self.controllers
            .iter()
            .filter(|c| c.matches(dirs, caps, devs))
            .find(|c| c.is_idle())
    }

    /// Candidate with the fewest busy channels, earliest in pool order on
    /// a tie.
    fn select_shared(&self, dirs: u32, caps: u32, devs: u32) -> Option<&DmaController> {
        let mut best: Option<(&DmaController, u32)> = None;

        for controller in self.controllers.iter().filter(|c| c.matches(dirs, caps, devs)) {
            // one snapshot per candidate; strict less keeps the earliest on ties
            let busy = controller.busy_channels();
            match best {
                Some((_, min)) if busy >= min => {}
                _ => best = Some((controller, busy)),
            }
        }

        best.map(|(controller, _)| controller)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::std_instead_of_core)]
mod tests {
    extern crate std;
    use std::vec::Vec;

    use super::*;

    /// Three engines: 0 and 1 serve SSP playback, 2 serves DMIC capture.
    fn pool() -> DmaPool<3> {
        DmaPool::new([
            DmaController::new(0, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP, DMA_DEV_SSP),
            DmaController::new(1, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_HP, DMA_DEV_SSP),
            DmaController::new(2, DMA_DIR_DEV_TO_MEM, DMA_CAP_GP_HP, DMA_DEV_DMIC),
        ])
    }

    fn set_busy<const N: usize>(pool: &DmaPool<N>, counts: [u32; N]) {
        for (index, count) in counts.into_iter().enumerate() {
            let controller = pool.get(index).unwrap();
            for _ in 0..count {
                controller.channel_started();
            }
        }
    }

    // =========================================================================
    // Filtering Tests
    // =========================================================================

    #[test]
    fn zero_filters_match_every_controller() {
        let pool = pool();
        let chosen = pool.select(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 0);
    }

    #[test]
    fn direction_filter_excludes_non_matching() {
        let pool = pool();
        let chosen = pool
            .select(DMA_DIR_DEV_TO_MEM, 0, 0, AccessMode::Shared)
            .unwrap();
        assert_eq!(chosen.id(), 2);
    }

    #[test]
    fn capability_filter_excludes_non_matching() {
        let pool = pool();
        let chosen = pool
            .select(0, DMA_CAP_GP_HP, 0, AccessMode::Shared)
            .unwrap();
        assert_eq!(chosen.id(), 1);
    }

    #[test]
    fn device_filter_excludes_non_matching() {
        let pool = pool();
        let chosen = pool.select(0, 0, DMA_DEV_DMIC, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 2);
    }

    #[test]
    fn unmatched_filter_returns_none_in_both_modes() {
        let pool = pool();
        assert!(pool.select(0, DMA_CAP_HDA_LINK, 0, AccessMode::Shared).is_none());
        assert!(pool.select(0, DMA_CAP_HDA_LINK, 0, AccessMode::Exclusive).is_none());
        assert!(pool.select(0, 0, DMA_DEV_HOST, AccessMode::Shared).is_none());
        assert!(pool.select(DMA_DIR_DEV_TO_DEV, 0, 0, AccessMode::Exclusive).is_none());
    }

    #[test]
    fn all_filters_must_pass_together() {
        let pool = pool();
        // direction matches controller 2, device matches controllers 0 and 1
        assert!(
            pool.select(DMA_DIR_DEV_TO_MEM, 0, DMA_DEV_SSP, AccessMode::Shared)
                .is_none()
        );
    }

    // =========================================================================
    // Exclusive Mode Tests
    // =========================================================================

    #[test]
    fn exclusive_returns_first_idle_in_pool_order() {
        let pool = pool();
        let chosen = pool.select(0, 0, 0, AccessMode::Exclusive).unwrap();
        assert_eq!(chosen.id(), 0);
    }

    #[test]
    fn exclusive_skips_busy_controllers() {
        let pool = pool();
        set_busy(&pool, [1, 0, 0]);
        let chosen = pool.select(0, 0, 0, AccessMode::Exclusive).unwrap();
        assert_eq!(chosen.id(), 1);
    }

    #[test]
    fn exclusive_with_no_idle_candidate_returns_none() {
        let pool = pool();
        set_busy(&pool, [2, 1, 3]);
        assert!(pool.select(0, 0, 0, AccessMode::Exclusive).is_none());
    }

    #[test]
    fn exclusive_never_falls_back_to_least_busy() {
        let pool = pool();
        // controller 1 is the least busy candidate but not idle
        set_busy(&pool, [3, 1, 0]);
        assert!(
            pool.select(0, 0, DMA_DEV_SSP, AccessMode::Exclusive).is_none(),
            "exclusive must not degrade to a least-busy pick"
        );
    }

    // =========================================================================
    // Shared Mode Tests
    // =========================================================================

    #[test]
    fn shared_returns_least_busy_candidate() {
        let pool = pool();
        set_busy(&pool, [2, 0, 1]);
        let chosen = pool.select(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 1);
    }

    #[test]
    fn shared_tie_resolves_to_earliest_in_pool_order() {
        let all_tied = pool();
        set_busy(&all_tied, [1, 1, 1]);
        let chosen = all_tied.select(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 0);

        let tail_tied = pool();
        set_busy(&tail_tied, [1, 0, 0]);
        let chosen = tail_tied.select(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 1);
    }

    #[test]
    fn shared_accepts_busy_controllers() {
        let pool = pool();
        set_busy(&pool, [4, 7, 5]);
        let chosen = pool.select(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 0);
    }

    #[test]
    fn shared_respects_filters_before_load() {
        let pool = pool();
        // controller 2 is idle but serves DMIC only
        set_busy(&pool, [2, 3, 0]);
        let chosen = pool.select(0, 0, DMA_DEV_SSP, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 0);
    }

    // =========================================================================
    // Error-Propagating Form Tests
    // =========================================================================

    #[test]
    fn request_returns_chosen_controller() {
        let pool = pool();
        let chosen = pool.request(0, 0, 0, AccessMode::Shared).unwrap();
        assert_eq!(chosen.id(), 0);
    }

    #[test]
    fn request_maps_exhaustion_to_error() {
        let pool = pool();
        set_busy(&pool, [1, 1, 1]);
        assert_eq!(
            pool.request(0, 0, 0, AccessMode::Exclusive).unwrap_err(),
            DmaError::NoControllerAvailable
        );
        assert_eq!(
            pool.request(0, DMA_CAP_HDA_LINK, 0, AccessMode::Shared).unwrap_err(),
            DmaError::NoControllerAvailable
        );
    }

    // =========================================================================
    // Channel Accounting Tests
    // =========================================================================

    #[test]
    fn channel_accounting_round_trips() {
        let controller = DmaController::new(0, 0, 0, 0);
        assert!(controller.is_idle());

        controller.channel_started();
        controller.channel_started();
        assert_eq!(controller.busy_channels(), 2);
        assert!(!controller.is_idle());

        controller.channel_stopped();
        controller.channel_stopped();
        assert!(controller.is_idle());
    }

    #[test]
    fn channel_stopped_saturates_at_zero() {
        let controller = DmaController::new(0, 0, 0, 0);
        controller.channel_stopped();
        assert_eq!(controller.busy_channels(), 0);
    }

    #[test]
    fn selection_does_not_change_busy_counts() {
        let pool = pool();
        set_busy(&pool, [2, 0, 1]);

        let _ = pool.select(0, 0, 0, AccessMode::Shared);
        let _ = pool.select(0, 0, 0, AccessMode::Exclusive);

        assert_eq!(pool.get(0).unwrap().busy_channels(), 2);
        assert_eq!(pool.get(1).unwrap().busy_channels(), 0);
        assert_eq!(pool.get(2).unwrap().busy_channels(), 1);
    }

    // =========================================================================
    // Pool Plumbing Tests
    // =========================================================================

    #[test]
    fn pool_len_and_indexing() {
        let pool = pool();
        assert_eq!(pool.len(), 3);
        assert!(!pool.is_empty());
        assert_eq!(pool.get(2).unwrap().id(), 2);
        assert!(pool.get(3).is_none());
    }

    #[test]
    fn empty_pool_selects_nothing() {
        let pool: DmaPool<0> = DmaPool::new([]);
        assert!(pool.is_empty());
        assert!(pool.select(0, 0, 0, AccessMode::Shared).is_none());
        assert!(pool.select(0, 0, 0, AccessMode::Exclusive).is_none());
    }

    #[test]
    fn controllers_iterates_in_pool_order() {
        let pool = pool();
        let ids: Vec<u32> = pool.controllers().map(DmaController::id).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn descriptor_static_fields() {
        let controller =
            DmaController::new(7, DMA_DIR_MEM_TO_DEV, DMA_CAP_GP_LP | DMA_CAP_GP_HP, DMA_DEV_PCM);
        assert_eq!(controller.id(), 7);
        assert_eq!(controller.dirs(), DMA_DIR_MEM_TO_DEV);
        assert_eq!(controller.caps(), DMA_CAP_GP_LP | DMA_CAP_GP_HP);
        assert_eq!(controller.devs(), DMA_DEV_PCM);
    }
}
