//! Component lifecycle state machine
//!
//! Every processing node in the pipeline owns a [`ComponentDevice`] whose
//! [`ComponentState`] advances in response to [`Trigger`] commands from the
//! pipeline/IPC layer. The legal transitions form a fixed table; anything
//! off the table is rejected without touching the device.
//!
//! The transition logic itself is a pure function,
//! [`ComponentState::on_trigger`], so the table can be inspected and tested
//! without a device. [`ComponentDevice::trigger`] is the mutating wrapper
//! the pipeline layer calls.
//!
//! # Concurrency
//!
//! A trigger call is a single synchronous state update with no blocking and
//! no hidden state; it is safe to run in interrupt context. The device
//! performs no locking of its own - callers that can race on the same
//! device must serialize, e.g. via [`SharedComponent`] from the `sync`
//! module.
//!
//! [`SharedComponent`]: crate::sync::SharedComponent

use crate::error::{ComponentError, ComponentResult};

// =============================================================================
// States
// =============================================================================

/// Operational state of a pipeline component device.
///
/// A device is created in [`Init`](ComponentState::Init) by pipeline
/// construction and reaches [`Active`](ComponentState::Active) through
/// RESET, PREPARE and START triggers. See [`ComponentState::on_trigger`]
/// for the full transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComponentState {
    /// Created by pipeline construction, not yet reset
    #[default]
    Init,
    /// Reset complete, no stream parameters applied
    Ready,
    /// Suspended by power management; only RESET leaves this state
    Suspend,
    /// Stream parameters applied, ready to start
    Prepare,
    /// Stream paused, position retained
    Paused,
    /// Stream running
    Active,
}

impl ComponentState {
    /// Returns a human-readable name of the state
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentState::Init => "init",
            ComponentState::Ready => "ready",
            ComponentState::Suspend => "suspend",
            ComponentState::Prepare => "prepare",
            ComponentState::Paused => "paused",
            ComponentState::Active => "active",
        }
    }

    /// Evaluate a trigger against the transition table.
    ///
    /// Returns the successor state if `(self, trigger)` is a legal pair,
    /// `None` otherwise. Pure: no side effects, deterministic.
    ///
    /// | From | Trigger | To |
    /// |---|---|---|
    /// | `Prepare`, `Paused` | `Start` | `Active` |
    /// | `Paused` | `Release` | `Active` |
    /// | `Active` | `Stop`, `Xrun` | `Prepare` |
    /// | `Active` | `Pause` | `Paused` |
    /// | any | `Reset` | `Ready` |
    /// | `Ready`, `Prepare` | `Prepare` | `Prepare` |
    ///
    /// The matches are exhaustive: adding a state or trigger variant
    /// forces this table to be revisited at compile time.
    #[must_use]
    pub const fn on_trigger(self, trigger: Trigger) -> Option<ComponentState> {
        match trigger {
            Trigger::Start => match self {
                ComponentState::Prepare | ComponentState::Paused => Some(ComponentState::Active),
                ComponentState::Init
                | ComponentState::Ready
                | ComponentState::Suspend
                | ComponentState::Active => None,
            },
            Trigger::Release => match self {
                ComponentState::Paused => Some(ComponentState::Active),
                ComponentState::Init
                | ComponentState::Ready
                | ComponentState::Suspend
                | ComponentState::Prepare
                | ComponentState::Active => None,
            },
            Trigger::Stop | Trigger::Xrun => match self {
                ComponentState::Active => Some(ComponentState::Prepare),
                ComponentState::Init
                | ComponentState::Ready
                | ComponentState::Suspend
                | ComponentState::Prepare
                | ComponentState::Paused => None,
            },
            Trigger::Pause => match self {
                ComponentState::Active => Some(ComponentState::Paused),
                ComponentState::Init
                | ComponentState::Ready
                | ComponentState::Suspend
                | ComponentState::Prepare
                | ComponentState::Paused => None,
            },
            // Reset is accepted from every state, Ready -> Ready included
            Trigger::Reset => Some(ComponentState::Ready),
            Trigger::Prepare => match self {
                ComponentState::Ready | ComponentState::Prepare => Some(ComponentState::Prepare),
                ComponentState::Init
                | ComponentState::Suspend
                | ComponentState::Paused
                | ComponentState::Active => None,
            },
        }
    }
}

impl core::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Triggers
// =============================================================================

/// Trigger command asking a component device to change operational state.
///
/// The command set is closed; triggers arrive from the pipeline/IPC layer
/// in response to host control messages or error recovery (XRUN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Start streaming from a prepared or paused device
    Start,
    /// Resume streaming from a paused device
    Release,
    /// Stop an active stream, back to prepared
    Stop,
    /// Underrun/overrun recovery, treated like a stop
    Xrun,
    /// Pause an active stream
    Pause,
    /// Return to ready, accepted from every state
    Reset,
    /// Apply stream parameters
    Prepare,
}

impl Trigger {
    /// Returns a human-readable name of the trigger
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Trigger::Start => "start",
            Trigger::Release => "release",
            Trigger::Stop => "stop",
            Trigger::Xrun => "xrun",
            Trigger::Pause => "pause",
            Trigger::Reset => "reset",
            Trigger::Prepare => "prepare",
        }
    }
}

impl core::fmt::Display for Trigger {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Component Device
// =============================================================================

/// Lifecycle state of one pipeline processing node.
///
/// Created in [`ComponentState::Init`] by pipeline construction; the only
/// mutation path afterwards is [`trigger`](Self::trigger). The constructor
/// is `const` so devices can live in static pipeline tables.
///
/// # Example
///
/// ```
/// use adsp_pipectl::{ComponentDevice, ComponentState, Trigger};
///
/// let mut dev = ComponentDevice::new();
/// dev.trigger(Trigger::Reset).unwrap();
/// dev.trigger(Trigger::Prepare).unwrap();
/// dev.trigger(Trigger::Start).unwrap();
/// assert_eq!(dev.state(), ComponentState::Active);
/// ```
#[derive(Debug)]
pub struct ComponentDevice {
    state: ComponentState,
}

impl ComponentDevice {
    /// Create a new device in [`ComponentState::Init`] (const, suitable for
    /// static initialization).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ComponentState::Init,
        }
    }

    /// Get the current lifecycle state
    #[inline(always)]
    #[must_use]
    pub const fn state(&self) -> ComponentState {
        self.state
    }

    /// Apply a trigger command.
    ///
    /// If `(state, trigger)` is a legal pair the device moves to the
    /// target state and the call succeeds. Otherwise the state is left
    /// unchanged and [`ComponentError::InvalidTransition`] is returned;
    /// the caller decides whether to ignore, retry with a different
    /// command, or propagate the failure up to the IPC layer.
    ///
    /// The update is a single synchronous store - atomic from the
    /// caller's point of view, no partial update possible.
    pub fn trigger(&mut self, trigger: Trigger) -> ComponentResult<()> {
        match self.state.on_trigger(trigger) {
            Some(next) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("component trigger {}: {} -> {}", trigger, self.state, next);
                self.state = next;
                Ok(())
            }
            None => Err(ComponentError::InvalidTransition),
        }
    }
}

impl Default for ComponentDevice {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
