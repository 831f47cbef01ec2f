pub mod error;
pub mod locations;
pub mod results;
pub mod superuser;

pub use error::{AdminError, Result};
pub use locations::{ImportSummary, LocationSink, import_locations, parse_locations};
pub use results::record_result;
pub use superuser::{SuperuserInput, create_superuser};
