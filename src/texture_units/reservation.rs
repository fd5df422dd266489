use std::sync::Weak;

use crate::{layer::LayerId, texture_units::TextureUnitPool};

/// A scoped claim on a texture image unit.
///
/// Dropping the reservation returns the unit to the pool it came from. The
/// back-reference is weak, so a reservation never extends the pool's
/// lifetime; if the pool is already gone, dropping the reservation does
/// nothing.
///
/// Reservations move but do not clone - a second copy would release the
/// same unit twice.
pub struct UnitReservation {
    unit: Option<u32>,
    layer: Option<LayerId>,
    pool: Weak<TextureUnitPool>,
}

impl UnitReservation {
    pub(crate) fn new(
        unit: u32,
        layer: Option<LayerId>,
        pool: Weak<TextureUnitPool>,
    ) -> Self {
        Self {
            unit: Some(unit),
            layer,
            pool,
        }
    }

    /// The reserved unit index, or `None` once released.
    pub fn unit(&self) -> Option<u32> {
        self.unit
    }

    /// True while the reservation still holds a unit.
    pub fn is_valid(&self) -> bool {
        self.unit.is_some()
    }

    /// Return the unit to the pool ahead of drop.
    ///
    /// Afterwards the reservation is inert: `unit()` is `None` and the
    /// eventual drop does nothing. Calling this twice is harmless.
    pub fn release(&mut self) {
        if let (Some(unit), Some(pool)) =
            (self.unit.take(), self.pool.upgrade())
        {
            pool.release_by_id(unit, self.layer);
        }
    }
}

impl Default for UnitReservation {
    /// An empty reservation holding no unit. Handy as a placeholder field
    /// which is later replaced by a real reservation.
    fn default() -> Self {
        Self {
            unit: None,
            layer: None,
            pool: Weak::new(),
        }
    }
}

impl Drop for UnitReservation {
    fn drop(&mut self) {
        self.release();
    }
}
