pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod polyline;
pub mod schedule;
pub mod session;

pub use error::RouteError;
