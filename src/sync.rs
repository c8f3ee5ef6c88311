//! ISR-safe synchronization wrappers
//!
//! The lifecycle controller assumes at most one concurrent trigger call
//! per device and performs no locking of its own. When triggers can
//! arrive from more than one execution context - say an IPC task and an
//! XRUN recovery interrupt - the caller must serialize them. This module
//! provides that serialization using the `critical-section` crate.
//!
//! # Types
//!
//! - [`CriticalSectionCell`] - generic interior-mutability cell, all
//!   access inside a critical section
//! - [`SharedComponent`] - ISR-safe component device wrapper
//!
//! For single-context use (all triggers confined to one task), a plain
//! [`ComponentDevice`] is simpler and has no overhead.
//!
//! # Example
//!
//! ```
//! use adsp_pipectl::sync::SharedComponent;
//! use adsp_pipectl::Trigger;
//!
//! static MIXER: SharedComponent = SharedComponent::new();
//!
//! // IPC task
//! MIXER.trigger(Trigger::Reset).unwrap();
//!
//! // XRUN interrupt handler - safe, interrupts disabled during access
//! fn xrun_isr() {
//!     let _ = MIXER.trigger(Trigger::Xrun);
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::component::{ComponentDevice, ComponentState, Trigger};
use crate::error::ComponentResult;

// =============================================================================
// Critical Section Cell
// =============================================================================

/// Cell providing interior mutability with critical section protection.
///
/// Combines `critical_section::Mutex` with `RefCell` for safe mutable
/// access from both normal code and interrupt handlers.
pub struct CriticalSectionCell<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> CriticalSectionCell<T> {
    /// Create a new cell (const, suitable for static initialization).
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Execute a closure with exclusive mutable access.
    ///
    /// Interrupts are disabled for the duration of the closure.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            let mut value = self.inner.borrow_ref_mut(cs);
            f(&mut value)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut value| f(&mut value))
        })
    }
}

// =============================================================================
// Shared Component Device
// =============================================================================

/// ISR-safe component device wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, so a trigger from
/// an interrupt handler cannot interleave with one from task context.
pub struct SharedComponent {
    inner: CriticalSectionCell<ComponentDevice>,
}

impl SharedComponent {
    /// Create a shared device in the initial lifecycle state (const,
    /// suitable for static initialization).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(ComponentDevice::new()),
        }
    }

    /// Apply a trigger command inside a critical section.
    ///
    /// Same contract as [`ComponentDevice::trigger`], serialized across
    /// execution contexts.
    pub fn trigger(&self, trigger: Trigger) -> ComponentResult<()> {
        self.inner.with(|device| device.trigger(trigger))
    }

    /// Read the current lifecycle state.
    ///
    /// A snapshot: another context may trigger a transition immediately
    /// after the read.
    #[must_use]
    pub fn state(&self) -> ComponentState {
        self.inner.with(|device| device.state())
    }

    /// Execute a closure with exclusive access to the device.
    ///
    /// Interrupts are disabled for the duration of the closure. Useful to
    /// combine a state check and a trigger without a window in between.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut ComponentDevice) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut ComponentDevice) -> R,
    {
        self.inner.try_with(f)
    }
}

impl Default for SharedComponent {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
