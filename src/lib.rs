pub mod constants;
pub mod derived_state;
pub mod ephemeris;
pub mod events;
pub mod scanner;
pub mod search;
pub mod search_params;
pub mod sextant;
pub mod sextant_errors;
pub mod state_cache;
pub mod time;

pub use derived_state::{DerivedBodies, DerivedState};
pub use ephemeris::{Body, EphemerisOracle, HeliocentricCoords};
pub use events::{Event, EventKind, VisibilityWindow};
pub use search_params::SearchParams;
pub use sextant::Sextant;
pub use sextant_errors::SextantError;
