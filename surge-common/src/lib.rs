use bytes::Bytes;
use http_body_util::Full;

#[inline]
pub fn empty_body() -> Full<Bytes> {
    Full::new(Bytes::new())
}

#[inline]
pub fn byte_body<B: Into<Bytes>>(bytes: B) -> Full<Bytes> {
    Full::new(bytes.into())
}

/// One driver position report, as posted to `/driver/location`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverLocationUpdate {
    pub driver_id: String,
    pub lat: f64,
    pub lng: f64,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

/// Body of a `/price` response. Only the surge multiplier is consumed by the
/// simulator; the remaining fields exist so mock responses match the real
/// service's shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surge_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_price: Option<f64>,
}

impl PriceResponse {
    #[must_use]
    pub fn with_surge(base_fare: f64, surge_multiplier: f64) -> Self {
        Self {
            base_fare: Some(base_fare),
            surge_multiplier: Some(surge_multiplier),
            final_price: Some(base_fare * surge_multiplier),
        }
    }

    /// The service may omit the multiplier, in which case no surge applies.
    #[inline]
    #[must_use]
    pub fn surge_or_default(&self) -> f64 {
        self.surge_multiplier.unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_update_uses_camel_case_keys() {
        let update = DriverLocationUpdate {
            driver_id: "driver_0001".to_owned(),
            lat: 37.7749,
            lng: -122.4194,
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["driverId"], "driver_0001");
        assert_eq!(json["lat"], 37.7749);
        assert_eq!(json["lng"], -122.4194);
        assert_eq!(json["timestamp"], 1_700_000_000_000_i64);
    }

    #[test]
    fn missing_surge_multiplier_defaults_to_one() {
        let resp: PriceResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.surge_or_default(), 1.0);

        let resp: PriceResponse =
            serde_json::from_str(r#"{"baseFare":10.0,"surgeMultiplier":2.5,"finalPrice":25.0}"#)
                .unwrap();
        assert_eq!(resp.surge_or_default(), 2.5);
    }
}
