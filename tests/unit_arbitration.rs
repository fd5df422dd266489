//! End-to-end arbitration scenarios: a fresh pool over four hardware
//! units, shared by the terrain engine, imagery layers, and plugins.

use std::sync::Arc;

use ccthw_terrain_resources::{
    capabilities::StaticCapabilities,
    layer::{Layer, LayerId},
    texture_units::TextureUnitPool,
};

struct ImageryLayer {
    id: LayerId,
    name: String,
}

impl ImageryLayer {
    fn named(name: &str) -> Self {
        Self {
            id: LayerId::next(),
            name: name.to_owned(),
        }
    }
}

impl Layer for ImageryLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn pool_with_units(max_units: u32) -> Arc<TextureUnitPool> {
    TextureUnitPool::new(Arc::new(StaticCapabilities::new(max_units)))
}

#[test]
fn basic_fill_and_empty() {
    let pool = pool_with_units(4);

    assert_eq!(pool.reserve(Some("terrain engine")), Some(0));
    assert_eq!(pool.reserve(Some("elevation")), Some(1));
    assert_eq!(pool.reserve(Some("normal maps")), Some(2));
    assert_eq!(pool.reserve(Some("splat mask")), Some(3));
    assert_eq!(pool.reserve(Some("one too many")), None);

    pool.release(1);
    assert_eq!(pool.reserve(None), Some(1));
}

#[test]
fn per_layer_reservations_overlap_across_layers() {
    let pool = pool_with_units(4);
    let l1 = ImageryLayer::named("satellite");
    let l2 = ImageryLayer::named("street map");

    assert_eq!(pool.reserve_for_layer(Some(&l1), None), Some(0));
    assert_eq!(pool.reserve_for_layer(Some(&l2), None), Some(0));
    assert_eq!(pool.reserve_for_layer(Some(&l1), None), Some(1));
    assert_eq!(pool.reserve_for_layer(Some(&l2), None), Some(1));
}

#[test]
fn mixed_global_and_per_layer() {
    let pool = pool_with_units(4);
    let layer = ImageryLayer::named("satellite");

    assert_eq!(pool.reserve(Some("terrain engine")), Some(0));
    // Unit 0 is globally taken, so the layer's first fit skips it.
    assert_eq!(pool.reserve_for_layer(Some(&layer), None), Some(1));
}

#[test]
fn off_limits_units_are_skipped_and_conflicts_rejected() {
    let pool = pool_with_units(4);

    assert!(pool.mark_off_limits(2));
    assert_eq!(pool.reserve(None), Some(0));
    assert_eq!(pool.reserve(None), Some(1));
    assert_eq!(pool.reserve(None), Some(3));
    assert_eq!(pool.reserve(None), None);

    assert!(!pool.mark_off_limits(0));
}

#[test]
fn scoped_reservation_releases_on_scope_exit() {
    let pool = pool_with_units(4);
    let layer = ImageryLayer::named("satellite");

    {
        let reservation = pool
            .reserve_scoped_for_layer(Some(&layer), Some("color ramp"))
            .unwrap();
        assert_eq!(reservation.unit(), Some(0));
    }

    assert_eq!(pool.reserve_for_layer(Some(&layer), None), Some(0));
}

#[test]
fn reservation_survives_pool_teardown() {
    let pool = pool_with_units(4);
    let reservation = pool.reserve_scoped(Some("effect plugin")).unwrap();
    assert!(reservation.is_valid());

    drop(pool);
    drop(reservation);
}

#[test]
fn subsystems_racing_for_units_never_collide() {
    let pool = pool_with_units(32);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let pool = pool.clone();
            std::thread::spawn(move || {
                let layer =
                    ImageryLayer::named(&format!("worker {}", worker));
                let mut held = Vec::new();
                for _ in 0..4 {
                    held.push(pool.reserve(None).unwrap());
                    // Layer-scoped churn in between must not disturb the
                    // global claims.
                    let unit =
                        pool.reserve_for_layer(Some(&layer), None).unwrap();
                    pool.release_for_layer(unit, Some(&layer));
                }
                held
            })
        })
        .collect();

    let mut units: Vec<u32> = handles
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .collect();
    units.sort_unstable();
    units.dedup();
    assert_eq!(units.len(), 16);
}
