#![doc = "DistrictLens public API"]
mod attributes;
mod color;
mod ensemble;
mod fetch;
mod geojson;
mod io;
mod join;
mod shp;
mod states;

pub mod cli;
pub mod commands;

#[doc(inline)]
pub use geojson::{Feature, FeatureCollection, Geometry};

#[doc(inline)]
pub use join::{assign_districts, feature_centroid};

#[doc(inline)]
pub use attributes::{PrecinctStats, StatsById, join_attributes, read_stats_csv};

#[doc(inline)]
pub use color::{ColorScale, ColorStop, MetricRange, Rgb};

#[doc(inline)]
pub use ensemble::{
    DistrictQuantiles, EnsembleKind, EnsembleResult, OPPORTUNITY_THRESHOLD_PCT, OpportunityBin,
    SeatSplit, StateEnsembles, count_opportunity_districts,
};

#[doc(inline)]
pub use states::{DISTRICT_COLORS, DistrictStats, StateInfo, district_color, state_info, supported_states};

#[doc(inline)]
pub use io::{read_feature_collection, write_feature_collection};
