pub mod client;
pub mod records;

pub use client::{decode, DataClient, Endpoint};
pub use records::{
    GeoFeatureCollection, RawAnimationRecord, RawBarRecord, RawMapRecord, RawScatterRecord,
};
