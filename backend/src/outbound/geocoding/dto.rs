//! DTOs for decoding Mapbox Places responses.
//!
//! Only the fields the adapter maps are declared; unknown fields are
//! ignored so provider additions do not break decoding.

use serde::Deserialize;

use crate::domain::GeoPoint;
use crate::domain::ports::GeocodeMatch;

#[derive(Debug, Deserialize)]
pub(super) struct FeatureCollectionDto {
    #[serde(default)]
    pub(super) features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeatureDto {
    pub(super) place_name: String,
    pub(super) geometry: GeometryDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeometryDto {
    #[serde(rename = "type")]
    pub(super) kind: String,
    pub(super) coordinates: Vec<f64>,
}

impl FeatureCollectionDto {
    pub(super) fn into_matches(self) -> Result<Vec<GeocodeMatch>, String> {
        self.features
            .into_iter()
            .map(FeatureDto::into_match)
            .collect()
    }
}

impl FeatureDto {
    fn into_match(self) -> Result<GeocodeMatch, String> {
        if self.geometry.kind != "Point" {
            return Err(format!(
                "feature '{}' has unsupported geometry type {}",
                self.place_name, self.geometry.kind
            ));
        }
        let &[longitude, latitude] = self.geometry.coordinates.as_slice() else {
            return Err(format!(
                "feature '{}' must carry exactly two coordinates",
                self.place_name
            ));
        };
        let point = GeoPoint::try_new(longitude, latitude)
            .map_err(|err| format!("feature '{}': {err}", self.place_name))?;
        Ok(GeocodeMatch {
            place_name: self.place_name,
            point,
        })
    }
}
