//! Rating computation and fair ranking engine for a UK school directory.
//!
//! The engine turns partially-missing public datasets into a comparable 1-10
//! overall rating, tracks how much of that rating rests on real data, and
//! orders schools within an area without letting data-poor schools float to
//! the top of a leaderboard.

pub mod config;
pub mod datasets;
pub mod directory;
pub mod error;
pub mod geography;
pub mod ranking;
pub mod ratings;
pub mod refresh;
pub mod service;
pub mod sources;
pub mod telemetry;

pub use directory::{
    InMemoryDirectory, LocationSearch, SchoolDirectory, SchoolProfile, SchoolRecord, StoredRating,
};
pub use geography::{aggregate_geography, GeoSummary};
pub use ranking::{rank_schools, top_n, RankCandidate, RankTier, RankedSchool};
pub use ratings::{compute_rating, JurisdictionPolicy, Rating, RatingComponent, SchoolMetrics};
pub use service::{rating_router, SchoolService};
