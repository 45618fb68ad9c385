use serde::Deserialize;

use super::DetectionError;

#[derive(Debug, Deserialize)]
struct ChairResponse {
    chair_count: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct PersonDetection {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OccupancyResponse {
    detections: Option<Vec<PersonDetection>>,
}

/// Parse `{"chair_count": <int>}`.
pub fn parse_chair_count(body: &str) -> Result<u32, DetectionError> {
    let response: ChairResponse =
        serde_json::from_str(body).map_err(|err| DetectionError::Malformed(err.to_string()))?;
    let value = response
        .chair_count
        .ok_or(DetectionError::MissingField("chair_count"))?;

    value
        .as_u64()
        .and_then(|count| u32::try_from(count).ok())
        .ok_or_else(|| DetectionError::Malformed(format!("chair_count is not a count: {value}")))
}

/// Parse `{"detections": [{"status": ...}, ...]}` into the number of seated people.
pub fn parse_seated_count(body: &str) -> Result<u32, DetectionError> {
    let response: OccupancyResponse =
        serde_json::from_str(body).map_err(|err| DetectionError::Malformed(err.to_string()))?;
    let detections = response
        .detections
        .ok_or(DetectionError::MissingField("detections"))?;
    Ok(count_seated(&detections))
}

pub fn count_seated(detections: &[PersonDetection]) -> u32 {
    let seated = detections
        .iter()
        .filter(|detection| {
            detection
                .status
                .as_deref()
                .is_some_and(|status| status.eq_ignore_ascii_case("sitting"))
        })
        .count();
    u32::try_from(seated).unwrap_or(u32::MAX)
}
