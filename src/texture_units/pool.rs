use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use crate::{
    capabilities::Capabilities,
    layer::{Layer, LayerId},
    markdown::MdList,
    texture_units::{TextureUnitError, UnitReservation},
};

/// The bookkeeping guarded by the pool's mutex.
///
/// A unit in `global` is blocked for everyone. A unit in `per_layer[id]`
/// is blocked only while that layer is the one reserving. The pool never
/// voluntarily places one unit in two sets.
#[derive(Default)]
struct ReservedUnits {
    global: BTreeSet<u32>,
    per_layer: HashMap<LayerId, BTreeSet<u32>>,
}

impl ReservedUnits {
    /// Collect every unit which is in use by anyone.
    fn taken_by_all(&self) -> BTreeSet<u32> {
        let mut taken = self.global.clone();
        for units in self.per_layer.values() {
            taken.extend(units.iter().copied());
        }
        taken
    }

    /// Collect the units blocked for one particular layer.
    ///
    /// Other layers' reservations are deliberately absent: two layers
    /// never bind within the same register set, so they may share units.
    fn taken_by_layer(&self, layer: LayerId) -> BTreeSet<u32> {
        let mut taken = self.global.clone();
        if let Some(units) = self.per_layer.get(&layer) {
            taken.extend(units.iter().copied());
        }
        taken
    }
}

/// The smallest index in `[0, max_units)` which is not taken.
///
/// First-fit keeps unit assignments stable from run to run and packs them
/// at low indices.
fn first_free(taken: &BTreeSet<u32>, max_units: u32) -> Option<u32> {
    (0..max_units).find(|unit| !taken.contains(unit))
}

/// Arbitrates the hardware texture image units for one rendering context.
///
/// The pool is shared behind an `Arc` so that scoped reservations can keep
/// a weak back-reference to it. All operations are safe to call from any
/// thread; a single mutex guards the bookkeeping for the full duration of
/// each call.
pub struct TextureUnitPool {
    capabilities: Arc<dyn Capabilities>,
    reserved: Mutex<ReservedUnits>,
}

impl TextureUnitPool {
    /// Create a pool which sizes itself from the given capability
    /// provider.
    ///
    /// The unit count is re-read on every reservation, so a provider whose
    /// answer changes (e.g. after a device reset) is picked up without
    /// rebuilding the pool.
    pub fn new(capabilities: Arc<dyn Capabilities>) -> Arc<Self> {
        Arc::new(Self {
            capabilities,
            reserved: Mutex::new(ReservedUnits::default()),
        })
    }

    /// Reserve a texture unit for global use.
    ///
    /// The unit is excluded from every future reservation, global or
    /// per-layer, until [`TextureUnitPool::release`] is called for it.
    /// Returns `None` when every unit is already in use.
    ///
    /// The capability lookup happens while the pool's lock is held. That
    /// is fine for an in-memory provider; a provider which blocks has no
    /// business being polled here.
    pub fn reserve(&self, requestor: Option<&str>) -> Option<u32> {
        let mut reserved = self
            .reserved
            .lock()
            .expect("unable to acquire the reserved units lock");
        let max_units = self.capabilities.max_texture_image_units();

        let taken = reserved.taken_by_all();
        match first_free(&taken, max_units) {
            Some(unit) => {
                reserved.global.insert(unit);
                if let Some(requestor) = requestor {
                    log::info!(
                        "texture unit {} reserved for {}",
                        unit,
                        requestor
                    );
                }
                Some(unit)
            }
            None => {
                self.log_exhausted(&taken, max_units);
                None
            }
        }
    }

    /// Reserve a texture unit scoped to the given layer.
    ///
    /// Only globally reserved units and the layer's own reservations block
    /// the choice, so two distinct layers can end up holding the same
    /// unit. Passing `None` for the layer degrades to a global
    /// [`TextureUnitPool::reserve`].
    pub fn reserve_for_layer(
        &self,
        layer: Option<&dyn Layer>,
        requestor: Option<&str>,
    ) -> Option<u32> {
        let layer = match layer {
            Some(layer) => layer,
            None => return self.reserve(requestor),
        };

        let mut reserved = self
            .reserved
            .lock()
            .expect("unable to acquire the reserved units lock");
        let max_units = self.capabilities.max_texture_image_units();

        let taken = reserved.taken_by_layer(layer.id());
        match first_free(&taken, max_units) {
            Some(unit) => {
                reserved
                    .per_layer
                    .entry(layer.id())
                    .or_insert_with(BTreeSet::new)
                    .insert(unit);
                if let Some(requestor) = requestor {
                    log::info!(
                        "texture unit {} reserved by layer {} for {}",
                        unit,
                        layer.name(),
                        requestor
                    );
                }
                Some(unit)
            }
            None => {
                self.log_exhausted(&taken, max_units);
                None
            }
        }
    }

    /// Reserve a global texture unit via a scoped handle.
    ///
    /// The returned [`UnitReservation`] releases the unit when dropped.
    /// It holds only a weak reference, so it never keeps the pool alive
    /// and is inert if it outlives the pool.
    pub fn reserve_scoped(
        self: &Arc<Self>,
        requestor: Option<&str>,
    ) -> Result<UnitReservation, TextureUnitError> {
        match self.reserve(requestor) {
            Some(unit) => {
                Ok(UnitReservation::new(unit, None, Arc::downgrade(self)))
            }
            None => Err(TextureUnitError::NoFreeUnits(
                self.capabilities.max_texture_image_units(),
            )),
        }
    }

    /// Reserve a layer-scoped texture unit via a scoped handle.
    ///
    /// Unlike the raw [`TextureUnitPool::reserve_for_layer`], a layer is
    /// required here: passing `None` logs a warning and fails with
    /// [`TextureUnitError::LayerRequired`]. The asymmetry is deliberate -
    /// a scoped reservation made "for a layer" with no layer would
    /// silently produce a global claim with a very different lifetime.
    pub fn reserve_scoped_for_layer(
        self: &Arc<Self>,
        layer: Option<&dyn Layer>,
        requestor: Option<&str>,
    ) -> Result<UnitReservation, TextureUnitError> {
        let layer = match layer {
            Some(layer) => layer,
            None => {
                log::warn!(
                    "a layer-scoped texture unit reservation requires a \
                     layer"
                );
                return Err(TextureUnitError::LayerRequired);
            }
        };

        match self.reserve_for_layer(Some(layer), requestor) {
            Some(unit) => Ok(UnitReservation::new(
                unit,
                Some(layer.id()),
                Arc::downgrade(self),
            )),
            None => Err(TextureUnitError::NoFreeUnits(
                self.capabilities.max_texture_image_units(),
            )),
        }
    }

    /// Return a globally reserved unit to the pool.
    ///
    /// Releasing a unit which is not reserved is a no-op.
    pub fn release(&self, unit: u32) {
        let mut reserved = self
            .reserved
            .lock()
            .expect("unable to acquire the reserved units lock");
        reserved.global.remove(&unit);
    }

    /// Return a layer-scoped unit to the pool.
    ///
    /// Passing `None` for the layer degrades to the global
    /// [`TextureUnitPool::release`]. Teardown paths lean on this when the
    /// layer is already gone by the time the unit is returned.
    pub fn release_for_layer(&self, unit: u32, layer: Option<&dyn Layer>) {
        self.release_by_id(unit, layer.map(|layer| layer.id()));
    }

    /// Mark a unit as off-limits because an external subsystem bound it
    /// outside this pool's knowledge.
    ///
    /// Succeeds only while the unit is free in every scope. Once marked,
    /// the unit looks exactly like a global reservation: no future reserve
    /// will pick it, and [`TextureUnitPool::release`] lifts the mark.
    pub fn mark_off_limits(&self, unit: u32) -> bool {
        let mut reserved = self
            .reserved
            .lock()
            .expect("unable to acquire the reserved units lock");

        if reserved.global.contains(&unit) {
            return false;
        }
        let taken_by_a_layer = reserved
            .per_layer
            .values()
            .any(|units| units.contains(&unit));
        if taken_by_a_layer {
            return false;
        }

        reserved.global.insert(unit);
        log::info!("texture unit {} marked off-limits", unit);
        true
    }

    /// Release by layer id. Scoped reservations only remember the id, not
    /// the layer itself, so this is the path their drop takes.
    pub(crate) fn release_by_id(&self, unit: u32, layer: Option<LayerId>) {
        let layer = match layer {
            Some(layer) => layer,
            None => return self.release(unit),
        };

        let mut reserved = self
            .reserved
            .lock()
            .expect("unable to acquire the reserved units lock");
        if let Some(units) = reserved.per_layer.get_mut(&layer) {
            units.remove(&unit);
            if units.is_empty() {
                reserved.per_layer.remove(&layer);
            }
        }
    }

    fn log_exhausted(&self, taken: &BTreeSet<u32>, max_units: u32) {
        let taken: Vec<u32> = taken.iter().copied().collect();
        log::debug!(
            "no free texture units out of {}, taken: {}",
            max_units,
            MdList(&taken)
        );
    }
}
