//! The seam between the texture unit pool and whatever reports hardware
//! capabilities for the current rendering context.

/// Types which implement this trait can report the hardware limits that
/// unit arbitration depends on.
///
/// The pool reads the limit on every reserve call, so implementations must
/// be cheap, non-blocking, in-memory lookups. A provider which needs to
/// talk to the driver should cache its answer at device creation time.
pub trait Capabilities: Send + Sync {
    /// The number of texture image units the device exposes to shaders.
    ///
    /// Commonly between 8 and 32 on real hardware.
    fn max_texture_image_units(&self) -> u32;
}

/// A capability provider with a fixed unit count.
///
/// Useful for hosts which query the driver once at startup, and for tests.
pub struct StaticCapabilities {
    max_texture_image_units: u32,
}

impl StaticCapabilities {
    /// Create a provider which always reports the given unit count.
    pub fn new(max_texture_image_units: u32) -> Self {
        Self {
            max_texture_image_units,
        }
    }
}

impl Capabilities for StaticCapabilities {
    fn max_texture_image_units(&self) -> u32 {
        self.max_texture_image_units
    }
}
