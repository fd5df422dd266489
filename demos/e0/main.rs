use std::sync::Arc;

use anyhow::Result;
use ccthw_terrain_resources::{
    capabilities::StaticCapabilities,
    layer::{Layer, LayerId},
    logging,
    texture_units::TextureUnitPool,
};

/// A stand-in for the host engine's imagery layer type.
struct DemoLayer {
    id: LayerId,
    name: String,
}

impl DemoLayer {
    fn named(name: &str) -> Self {
        Self {
            id: LayerId::next(),
            name: name.to_owned(),
        }
    }
}

impl Layer for DemoLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn main() -> Result<()> {
    logging::setup()?;

    // A real host would size the pool from its render device's limits.
    let pool = TextureUnitPool::new(Arc::new(StaticCapabilities::new(8)));

    // The compositor binds unit 7 behind the pool's back.
    let marked = pool.mark_off_limits(7);
    log::info!("unit 7 off-limits: {}", marked);

    let elevation = pool
        .reserve(Some("elevation sampler"))
        .expect("a fresh pool always has a free unit");
    log::info!("terrain engine holds unit {}", elevation);

    let satellite = DemoLayer::named("satellite imagery");
    let streets = DemoLayer::named("street overlay");

    // Distinct layers can share the same unit number.
    let satellite_unit =
        pool.reserve_for_layer(Some(&satellite), Some("color texture"));
    let street_unit =
        pool.reserve_for_layer(Some(&streets), Some("color texture"));
    log::info!(
        "satellite -> {:?}, streets -> {:?}",
        satellite_unit,
        street_unit
    );

    {
        let scoped = pool
            .reserve_scoped_for_layer(Some(&satellite), Some("fog pass"))?;
        log::info!("fog pass borrows unit {:?}", scoped.unit());
        // Dropping the scoped reservation returns the unit.
    }

    if let Some(unit) = satellite_unit {
        pool.release_for_layer(unit, Some(&satellite));
    }
    if let Some(unit) = street_unit {
        pool.release_for_layer(unit, Some(&streets));
    }
    pool.release(elevation);
    pool.release(7);

    log::info!("all units returned");
    Ok(())
}
