use crate::models::{BoundingBox, CategoryFilter, FacilityRecord};

/// Check if a facility belongs to the requested category
#[inline]
pub fn matches_category(
    facility: &FacilityRecord,
    filter: &CategoryFilter,
) -> bool {
    filter.matches(&facility.facility_type)
}

/// Check if a facility passes the store-side prefilter
///
/// Same contract as `FacilityStore::query_by_bounding_box`: inclusive box,
/// exact category.
#[inline]
pub fn matches_store_query(
    facility: &FacilityRecord,
    bbox: &BoundingBox,
    filter: &CategoryFilter,
) -> bool {
    super::distance::is_within_bounding_box(facility.latitude, facility.longitude, bbox)
        && matches_category(facility, filter)
}

/// Check if a facility lies inside the search radius
///
/// Returns the exact distance when it does.
#[inline]
pub fn within_radius(
    facility: &FacilityRecord,
    origin_lat: f64,
    origin_lon: f64,
    radius_km: f64,
) -> Option<f64> {
    let distance_km = super::distance::haversine_distance(
        origin_lat,
        origin_lon,
        facility.latitude,
        facility.longitude,
    );

    (distance_km <= radius_km).then_some(distance_km)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::calculate_bounding_box;

    fn create_test_facility(facility_type: &str, lat: f64, lon: f64) -> FacilityRecord {
        FacilityRecord {
            id: 1,
            name: "Test Facility".to_string(),
            facility_type: facility_type.to_string(),
            address: "1 Test St".to_string(),
            latitude: lat,
            longitude: lon,
            phone: None,
            website: None,
            services: None,
            emergency_services: false,
            accepts_insurance: true,
        }
    }

    #[test]
    fn test_category_match() {
        let facility = create_test_facility("clinic", 40.75, -73.98);

        assert!(matches_category(&facility, &CategoryFilter::All));
        assert!(matches_category(&facility, &CategoryFilter::parse("clinic")));
        assert!(!matches_category(&facility, &CategoryFilter::parse("hospital")));
    }

    #[test]
    fn test_store_query_checks_box_and_category() {
        let bbox = calculate_bounding_box(40.7589, -73.9851, 5.0);
        let inside = create_test_facility("clinic", 40.75, -73.98);
        let outside = create_test_facility("clinic", 40.60, -73.98);

        assert!(matches_store_query(&inside, &bbox, &CategoryFilter::All));
        assert!(!matches_store_query(&inside, &bbox, &CategoryFilter::parse("pharmacy")));
        assert!(!matches_store_query(&outside, &bbox, &CategoryFilter::All));
    }

    #[test]
    fn test_within_radius_is_inclusive() {
        let facility = create_test_facility("clinic", 40.7420, -73.9881);
        let exact = crate::core::distance::haversine_distance(40.7589, -73.9851, 40.7420, -73.9881);

        assert_eq!(within_radius(&facility, 40.7589, -73.9851, exact), Some(exact));
        assert_eq!(within_radius(&facility, 40.7589, -73.9851, exact - 1e-9), None);
    }
}
