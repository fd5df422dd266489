mod markdown;

pub mod capabilities;
pub mod layer;
pub mod logging;
pub mod texture_units;
