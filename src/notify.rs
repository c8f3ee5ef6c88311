//! General purpose event notifiers
//!
//! Subsystems broadcast events to interested clients through a
//! [`NotifierRegistry`]: clients register a callback for an event id, and
//! the owning subsystem dispatches a message plus payload to every
//! matching callback. The registry is a fixed-capacity slot table - no
//! allocation, `const`-constructible for statics.
//!
//! One registry carries one payload type. The primary client in this
//! firmware is the clock subsystem, which fires [`CLOCK_NOTIFY_PRE`] /
//! [`CLOCK_NOTIFY_POST`] messages with [`ClockNotifyData`] around a
//! frequency change so DMA-paced consumers can re-derive timing.
//!
//! # Concurrency
//!
//! Registration and unregistration take `&mut self`; dispatch takes
//! `&self`. The registry performs no locking of its own - an owner that
//! mutates it from several execution contexts wraps it in a
//! [`CriticalSectionCell`](crate::sync::CriticalSectionCell).
//!
//! # Example
//!
//! ```
//! use adsp_pipectl::notify::{
//!     ClockNotifyData, Notifier, NotifierRegistry, CLOCK_NOTIFY_POST,
//! };
//!
//! const CLOCK_SSP: u32 = 2;
//!
//! fn on_clock_change(message: u32, data: &ClockNotifyData) {
//!     if message == CLOCK_NOTIFY_POST {
//!         // re-derive timing from data.freq / data.ticks_per_usec
//!     }
//! }
//!
//! let mut registry: NotifierRegistry<ClockNotifyData, 4> = NotifierRegistry::new();
//! registry.register(Notifier::new(CLOCK_SSP, on_clock_change)).unwrap();
//! ```

use crate::error::{NotifyError, NotifyResult};

// =============================================================================
// Clock Notifications
// =============================================================================

/// Clock change message: fired before the frequency changes
pub const CLOCK_NOTIFY_PRE: u32 = 0;
/// Clock change message: fired after the frequency has changed
pub const CLOCK_NOTIFY_POST: u32 = 1;

/// Payload delivered with clock frequency change notifications.
///
/// `PRE` messages carry the outgoing and incoming values so clients can
/// drain work paced by the old frequency; `POST` confirms the new values
/// are live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockNotifyData {
    /// Frequency in Hz before the change
    pub old_freq: u32,
    /// Timer ticks per microsecond before the change
    pub old_ticks_per_usec: u32,
    /// Frequency in Hz after the change
    pub freq: u32,
    /// Timer ticks per microsecond after the change
    pub ticks_per_usec: u32,
}

// =============================================================================
// Notifiers
// =============================================================================

/// Callback invoked on dispatch with the message and event payload.
///
/// Plain function pointer: callbacks capture nothing and run in whatever
/// execution context fires the event, interrupt context included.
pub type NotifyCallback<E> = fn(message: u32, data: &E);

/// A registered client: interested event id plus callback.
#[derive(Debug)]
pub struct Notifier<E> {
    id: u32,
    callback: NotifyCallback<E>,
}

impl<E> Notifier<E> {
    /// Create a notifier for events carrying the given id
    #[must_use]
    pub const fn new(id: u32, callback: NotifyCallback<E>) -> Self {
        Self { id, callback }
    }

    /// Event id this notifier is interested in
    #[inline(always)]
    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }
}

// Manual Clone/Copy: a fn pointer is always Copy, no bound on E wanted
impl<E> Clone for Notifier<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Notifier<E> {}

/// Handle identifying a registration within its registry.
///
/// Returned by [`NotifierRegistry::register`]; pass it back to
/// [`NotifierRegistry::unregister`] to free the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NotifierHandle(usize);

// =============================================================================
// Registry
// =============================================================================

/// Fixed-capacity table of registered notifiers for one event payload type.
///
/// # Type Parameters
/// * `E` - event payload delivered to callbacks
/// * `N` - number of registration slots
#[derive(Debug)]
pub struct NotifierRegistry<E, const N: usize> {
    slots: [Option<Notifier<E>>; N],
}

impl<E, const N: usize> NotifierRegistry<E, N> {
    /// Create an empty registry (const, suitable for static
    /// initialization).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; N],
        }
    }

    /// Total number of registration slots
    #[inline(always)]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of currently registered notifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether no notifier is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Register a notifier.
    ///
    /// Fails with [`NotifyError::RegistryFull`] when every slot is taken;
    /// the registry is left unchanged in that case.
    pub fn register(&mut self, notifier: Notifier<E>) -> NotifyResult<NotifierHandle> {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(notifier);
                return Ok(NotifierHandle(index));
            }
        }

        Err(NotifyError::RegistryFull)
    }

    /// Remove a registration, freeing its slot.
    ///
    /// A handle that was already unregistered is ignored.
    pub fn unregister(&mut self, handle: NotifierHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = None;
        }
    }

    /// Broadcast an event to every notifier registered for `id`.
    ///
    /// Callbacks run synchronously in registration-slot order, in the
    /// caller's execution context. Notifiers registered for other ids are
    /// skipped.
    pub fn event(&self, id: u32, message: u32, data: &E) {
        for notifier in self.slots.iter().flatten() {
            if notifier.id == id {
                (notifier.callback)(message, data);
            }
        }
    }
}

impl<E, const N: usize> Default for NotifierRegistry<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
