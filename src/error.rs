//! Error types for the pipeline control plane
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ComponentError`]: lifecycle trigger failures
//! - [`DmaError`]: DMA controller arbitration failures
//! - [`NotifyError`]: notifier registry failures
//!
//! The unified [`Error`] enum wraps all domain errors for callers that
//! funnel several domains through one result path.
//!
//! Every variant is an expected, locally-recoverable condition: nothing in
//! this crate is fatal to the firmware, and nothing here panics.

// =============================================================================
// Component Errors
// =============================================================================

/// Component lifecycle errors
///
/// Returned by trigger application on a component device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ComponentError {
    /// The trigger command is not legal from the device's current state
    InvalidTransition,
}

impl core::fmt::Display for ComponentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ComponentError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentError::InvalidTransition => "invalid state transition",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA controller arbitration errors
///
/// These describe allocation outcomes, not hardware faults; they are
/// expected under resource contention and handled by retry, queuing, or
/// surfacing exhaustion to the pipeline layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No controller matches the filter criteria, or none is idle for an
    /// exclusive request
    NoControllerAvailable,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::NoControllerAvailable => "no DMA controller available",
        }
    }
}

// =============================================================================
// Notifier Errors
// =============================================================================

/// Notifier registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotifyError {
    /// The fixed-capacity registry has no free slot
    RegistryFull,
}

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NotifyError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotifyError::RegistryFull => "notifier registry full",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Component(ComponentError::InvalidTransition)) => { /* ... */ }
///     Err(Error::Dma(DmaError::NoControllerAvailable)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Component lifecycle error
    Component(ComponentError),
    /// DMA arbitration error
    Dma(DmaError),
    /// Notifier registry error
    Notify(NotifyError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Component(e) => write!(f, "component: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Notify(e) => write!(f, "notify: {}", e.as_str()),
        }
    }
}

// From impls for automatic conversion
impl From<ComponentError> for Error {
    fn from(e: ComponentError) -> Self {
        Error::Component(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<NotifyError> for Error {
    fn from(e: NotifyError) -> Self {
        Error::Notify(e)
    }
}

/// Result type alias for control-plane operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for component lifecycle operations
pub type ComponentResult<T> = core::result::Result<T, ComponentError>;

/// Result type alias for DMA arbitration operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for notifier registry operations
pub type NotifyResult<T> = core::result::Result<T, NotifyError>;

// =============================================================================
// Unit Tests
// =============================================================================
