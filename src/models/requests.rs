use serde::{Deserialize, Serialize};

/// A numeric request parameter.
///
/// Query strings always carry text while JSON bodies may carry either a
/// number or a numeric string, so parsing is deferred to the search layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericParam {
    Number(f64),
    Text(String),
}

impl NumericParam {
    /// Parse into a finite float
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            NumericParam::Number(n) => *n,
            NumericParam::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericParam {
    fn from(value: f64) -> Self {
        NumericParam::Number(value)
    }
}

impl From<&str> for NumericParam {
    fn from(value: &str) -> Self {
        NumericParam::Text(value.to_string())
    }
}

/// Request to find nearby facilities
///
/// Accepted both as a query string (`lat`, `lng`, `radius`, `type`) and as a
/// JSON body (`latitude`, `longitude`, `radiusKm`, `category`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyFacilitiesRequest {
    #[serde(alias = "lat", default)]
    pub latitude: Option<NumericParam>,
    #[serde(alias = "lng", alias = "lon", default)]
    pub longitude: Option<NumericParam>,
    #[serde(rename = "radiusKm", alias = "radius", alias = "radius_km", default)]
    pub radius_km: Option<NumericParam>,
    #[serde(alias = "type", default)]
    pub category: Option<String>,
}
