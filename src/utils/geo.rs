use crate::error::{AppError, AppResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Spatial reference of every stored point (WGS 84).
pub const SRID: i32 = 4326;

/// Wire form of a location. Stored as WKT `POINT(lon lat)` tagged with [`SRID`]
/// (longitude first) and read back through `ST_Y`/`ST_X`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> AppResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::Validation(format!(
                "latitude out of range: {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::Validation(format!(
                "longitude out of range: {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// A point exists only when both coordinates do; a lone coordinate is
    /// dropped rather than stored as a degenerate point.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<Option<Self>> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).map(Some),
            _ => Ok(None),
        }
    }

    /// Rebuilds a point from `ST_Y`/`ST_X` result columns.
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn to_wkt(&self) -> String {
        encode_point(self.latitude, self.longitude)
    }
}

/// Legacy combined `"lat,lon"` tag used by the complaint form.
impl FromStr for GeoPoint {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error =
            || AppError::Validation("geo_tag must be in the form \"latitude,longitude\"".to_string());

        let tokens: Vec<&str> = s.split(',').map(str::trim).collect();
        if tokens.len() != 2 {
            return Err(format_error());
        }
        let latitude: f64 = tokens[0].parse().map_err(|_| format_error())?;
        let longitude: f64 = tokens[1].parse().map_err(|_| format_error())?;
        Self::new(latitude, longitude)
    }
}

/// WKT literal for a point; longitude is the X axis and comes first.
pub fn encode_point(latitude: f64, longitude: f64) -> String {
    format!("POINT({} {})", longitude, latitude)
}

/// SQL expression turning a bound WKT parameter (`?`) into a stored point.
/// A NULL parameter yields a NULL point.
pub fn point_from_param() -> String {
    format!("ST_GeomFromText(?, {})", SRID)
}

/// Select-list fragment decoding the point column of `alias` into
/// `latitude`/`longitude` result columns.
pub fn decode_columns(alias: &str) -> String {
    format!(
        "ST_Y({alias}.geo_tag) AS latitude, ST_X({alias}.geo_tag) AS longitude",
        alias = alias
    )
}

/// Accepts a number, a numeric string, an empty string or null. Empty strings
/// count as absent, matching how forms submit cleared inputs.
pub fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid coordinate '{}'", s))),
    }
}
