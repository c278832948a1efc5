use serde::{Deserialize, Deserializer};

/// The nearest populated place to a coordinate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyPlace {
    pub toponym_name: String,
    /// Kilometres from the query point, as the service formats it.
    #[serde(deserialize_with = "string_or_number")]
    pub distance: String,
    /// First-level administrative division (state, province, ...).
    #[serde(default)]
    pub admin_name1: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FindNearbyResponse {
    #[serde(default)]
    pub(crate) geonames: Vec<NearbyPlace>,
    pub(crate) status: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiStatus {
    #[serde(default)]
    pub(crate) message: String,
    #[serde(default)]
    pub(crate) value: i64,
}

/// The service sends `distance` as a string, but numbers are accepted too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_place_reads_service_fields() {
        let place: NearbyPlace = serde_json::from_value(serde_json::json!({
            "toponymName": "Seattle",
            "distance": "0.41337",
            "adminName1": "Washington",
            "countryName": "United States",
            "geonameId": 5809844
        }))
        .unwrap();
        assert_eq!(place.toponym_name, "Seattle");
        assert_eq!(place.distance, "0.41337");
        assert_eq!(place.admin_name1.as_deref(), Some("Washington"));
        assert_eq!(place.country_name.as_deref(), Some("United States"));
    }

    #[test]
    fn numeric_distance_is_accepted() {
        let place: NearbyPlace = serde_json::from_value(serde_json::json!({
            "toponymName": "Zürich",
            "distance": 1.5
        }))
        .unwrap();
        assert_eq!(place.distance, "1.5");
        assert!(place.admin_name1.is_none());
        assert!(place.country_name.is_none());
    }

    #[test]
    fn status_envelope_parses() {
        let body: FindNearbyResponse = serde_json::from_value(serde_json::json!({
            "status": {"message": "user account not enabled", "value": 10}
        }))
        .unwrap();
        assert!(body.geonames.is_empty());
        let status = body.status.unwrap();
        assert_eq!(status.value, 10);
        assert_eq!(status.message, "user account not enabled");
    }
}
