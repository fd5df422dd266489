//! This module arbitrates the hardware texture image units between the
//! independent subsystems of a terrain renderer.
//!
//! Each subsystem (the terrain engine itself, imagery layers, effect
//! plugins) needs exclusive use of one or more sampler slots. The
//! [`TextureUnitPool`] tracks which units are claimed so no two subsystems
//! ever bind different textures to the same slot. Reservations come in two
//! scopes:
//!
//! - **global** - the unit is excluded from every future reservation until
//!   it is released.
//! - **per-layer** - the unit is excluded only for that layer. Two layers
//!   never bind concurrently within the same sampler register set, so
//!   distinct layers may hold the same unit.
//!
//! Reservations also come in two flavors: raw indices the caller releases
//! by hand, and scoped [`UnitReservation`] values which release their unit
//! when dropped.

mod pool;
mod reservation;

use thiserror::Error;

pub use self::{pool::TextureUnitPool, reservation::UnitReservation};

#[derive(Debug, Error)]
pub enum TextureUnitError {
    /// Every unit in `[0, max_units)` is already reserved or off-limits.
    #[error("all {} texture image units are already in use", .0)]
    NoFreeUnits(u32),

    /// A layer-scoped reservation was requested without a layer.
    #[error("a layer is required for a layer-scoped reservation")]
    LayerRequired,
}
