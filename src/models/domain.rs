use serde::{Deserialize, Serialize};
use validator::Validate;

/// Medical facility as stored in the facility store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Serialized JSON array of service tags, decoded lazily
    #[serde(default)]
    pub services: Option<String>,
    #[serde(rename = "emergencyServices", default)]
    pub emergency_services: bool,
    #[serde(rename = "acceptsInsurance", default = "default_true")]
    pub accepts_insurance: bool,
}

fn default_true() -> bool { true }

/// Facility waiting to be inserted into a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFacility {
    pub name: String,
    pub facility_type: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services: Option<String>,
    pub emergency_services: bool,
    pub accepts_insurance: bool,
}

impl NewFacility {
    /// Attach a store-assigned identifier
    pub fn into_record(self, id: i64) -> FacilityRecord {
        FacilityRecord {
            id,
            name: self.name,
            facility_type: self.facility_type,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            phone: self.phone,
            website: self.website,
            services: self.services,
            emergency_services: self.emergency_services,
            accepts_insurance: self.accepts_insurance,
        }
    }
}

/// Facility categories known to the application.
///
/// Records keep their category as a plain string, so categories outside this
/// list are still stored and searchable by exact name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Hospital,
    Clinic,
    Pharmacy,
    UrgentCare,
}

impl FacilityCategory {
    pub const ALL: [FacilityCategory; 4] = [
        FacilityCategory::Hospital,
        FacilityCategory::Clinic,
        FacilityCategory::Pharmacy,
        FacilityCategory::UrgentCare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FacilityCategory::Hospital => "hospital",
            FacilityCategory::Clinic => "clinic",
            FacilityCategory::Pharmacy => "pharmacy",
            FacilityCategory::UrgentCare => "urgent_care",
        }
    }
}

impl std::fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category restriction applied to a search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a raw filter value; `"all"` (exact, lowercase) disables filtering
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(raw.to_string())
        }
    }

    /// Category to push down to the store, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category.as_str()),
        }
    }

    /// Case-sensitive exact match
    #[inline]
    pub fn matches(&self, facility_type: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => category == facility_type,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("all"),
            CategoryFilter::Only(category) => f.write_str(category),
        }
    }
}

/// Validated nearby-facility query
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct SearchQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(range(exclusive_min = 0.0, message = "radius must be greater than 0"))]
    pub radius_km: f64,
    pub category: CategoryFilter,
}

/// Facility annotated with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyFacility {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services: Vec<String>,
    #[serde(rename = "emergencyServices")]
    pub emergency_services: bool,
    #[serde(rename = "acceptsInsurance")]
    pub accepts_insurance: bool,
    /// Kilometres from the origin, rounded to 2 decimals
    pub distance: f64,
}

/// Facility with its service list decoded, as returned by lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityDetails {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub services: Vec<String>,
    #[serde(rename = "emergencyServices")]
    pub emergency_services: bool,
    #[serde(rename = "acceptsInsurance")]
    pub accepts_insurance: bool,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
