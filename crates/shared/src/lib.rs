//! Proximity radar core.
//!
//! Places ranked entities on a three-zone radar plot and pages through them.
//! Nothing here does I/O: the nearby query and the drawing both live with the
//! caller.

pub mod config;
pub mod error;
pub mod models;
pub mod paging;
pub mod view;
pub mod zones;

pub use config::{PlotGeometry, RadarConfig};
pub use error::DataFault;
pub use models::{Anchor, Entity, RadarPoint, RawDistance, Zone};
pub use paging::Paginator;
pub use view::{RadarView, ViewState};
