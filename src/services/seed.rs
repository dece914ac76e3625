use serde::{Deserialize, Serialize};

use crate::models::{FacilityCategory, NewFacility};
use crate::services::store::{FacilityStore, StoreError};

/// Result of seeding a store with sample facilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOutcome {
    pub inserted: usize,
    pub message: String,
}

/// Insert the sample facilities if the store is empty
///
/// The emptiness check and the insert happen in one store operation, so
/// concurrent callers seed at most once.
pub async fn seed_sample_facilities(store: &dyn FacilityStore) -> Result<SeedOutcome, StoreError> {
    match store.insert_facilities_if_empty(sample_facilities()).await? {
        Some(ids) => {
            tracing::info!("Added {} sample facilities", ids.len());

            Ok(SeedOutcome {
                inserted: ids.len(),
                message: format!("Added {} sample facilities", ids.len()),
            })
        }
        None => {
            tracing::info!("Store already has facilities, skipping sample data");

            Ok(SeedOutcome {
                inserted: 0,
                message: "Data already exists".to_string(),
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn facility(
    name: &str,
    category: FacilityCategory,
    address: &str,
    latitude: f64,
    longitude: f64,
    phone: &str,
    website: &str,
    services: &[&str],
    emergency_services: bool,
) -> NewFacility {
    NewFacility {
        name: name.to_string(),
        facility_type: category.as_str().to_string(),
        address: address.to_string(),
        latitude,
        longitude,
        phone: Some(phone.to_string()),
        website: Some(website.to_string()),
        services: serde_json::to_string(services).ok(),
        emergency_services,
        accepts_insurance: true,
    }
}

/// Ten facilities around Manhattan and Brooklyn
pub fn sample_facilities() -> Vec<NewFacility> {
    use FacilityCategory::*;

    vec![
        facility(
            "NewYork-Presbyterian Hospital",
            Hospital,
            "525 E 68th St, New York, NY 10065",
            40.7614,
            -73.9540,
            "(212) 746-5454",
            "https://www.nyp.org",
            &["Emergency Care", "Surgery", "Cardiology", "Oncology"],
            true,
        ),
        facility(
            "Mount Sinai Hospital",
            Hospital,
            "1 Gustave L. Levy Pl, New York, NY 10029",
            40.7903,
            -73.9529,
            "(212) 241-6500",
            "https://www.mountsinai.org",
            &["Emergency Care", "Neurology", "Cardiology", "Surgery"],
            true,
        ),
        facility(
            "NYU Langone Health",
            Hospital,
            "550 1st Ave, New York, NY 10016",
            40.7424,
            -73.9732,
            "(212) 263-7300",
            "https://nyulangone.org",
            &["Emergency Care", "Surgery", "Orthopedics", "Cardiology"],
            true,
        ),
        facility(
            "CityMD Urgent Care - Midtown",
            UrgentCare,
            "160 E 32nd St, New York, NY 10016",
            40.7459,
            -73.9819,
            "(347) 850-3090",
            "https://www.citymd.com",
            &["Urgent Care", "X-rays", "Lab Tests"],
            false,
        ),
        facility(
            "CVS Pharmacy - Grand Central",
            Pharmacy,
            "150 E 42nd St, New York, NY 10017",
            40.7527,
            -73.9772,
            "(212) 818-9650",
            "https://www.cvs.com",
            &["Pharmacy", "Vaccinations", "Health Screening"],
            false,
        ),
        facility(
            "Walgreens Pharmacy - Times Square",
            Pharmacy,
            "1411 Broadway, New York, NY 10018",
            40.7546,
            -73.9869,
            "(212) 921-1589",
            "https://www.walgreens.com",
            &["Pharmacy", "Vaccinations", "Photo Services"],
            false,
        ),
        facility(
            "Manhattan Primary Care",
            Clinic,
            "51 E 25th St, New York, NY 10010",
            40.7420,
            -73.9881,
            "(212) 685-3800",
            "https://manhattanprimarycare.com",
            &["Primary Care", "Preventive Care", "Chronic Disease Management"],
            false,
        ),
        facility(
            "Duane Reade Pharmacy - Village",
            Pharmacy,
            "378 6th Ave, New York, NY 10014",
            40.7357,
            -74.0023,
            "(212) 674-5357",
            "https://www.duanereade.com",
            &["Pharmacy", "Health Products", "Beauty"],
            false,
        ),
        facility(
            "Brooklyn Methodist Hospital",
            Hospital,
            "506 6th St, Brooklyn, NY 11215",
            40.6736,
            -73.9857,
            "(718) 780-3000",
            "https://www.nyphospitals.org",
            &["Emergency Care", "Surgery", "Maternity", "Cardiology"],
            true,
        ),
        facility(
            "CityMD Urgent Care - Lower East Side",
            UrgentCare,
            "225 E Houston St, New York, NY 10002",
            40.7216,
            -73.9878,
            "(347) 850-3010",
            "https://www.citymd.com",
            &["Urgent Care", "COVID Testing", "Minor Injuries"],
            false,
        ),
    ]
}
