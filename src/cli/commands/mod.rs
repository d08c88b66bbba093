pub mod backup;
pub mod clock_in;
pub mod clock_out;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod project;
pub mod restore;
pub mod status;
pub mod track;

use crate::errors::AppResult;
use crate::models::coordinate::Coordinate;

/// Build the position override from `--lat/--lon/--accuracy` flags.
/// Clap guarantees lat and lon arrive together.
pub(crate) fn position_override(
    lat: Option<f64>,
    lon: Option<f64>,
    accuracy: Option<f64>,
) -> AppResult<Option<Coordinate>> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Some(Coordinate::with_accuracy(lat, lon, accuracy)?)),
        _ => Ok(None),
    }
}
