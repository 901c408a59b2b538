use crate::api::records::{
    GeoFeatureCollection, RawAnimationRecord, RawBarRecord, RawMapRecord, RawScatterRecord,
};
use crate::error::{DashboardError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Endpoints exposed by the data service, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BarChart,
    Scatter,
    MapChart,
    Geo,
    Animation,
}

impl Endpoint {
    pub const ALL: [Self; 5] = [
        Self::BarChart,
        Self::Scatter,
        Self::MapChart,
        Self::Geo,
        Self::Animation,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::BarChart => "/api/bar-chart-data",
            Self::Scatter => "/api/scatter-data",
            Self::MapChart => "/api/map-chart-data",
            Self::Geo => "/api/geo",
            Self::Animation => "/api/animation",
        }
    }
}

/// Thin GET-and-decode client; one request per dataset, no retries.
#[derive(Debug, Clone)]
pub struct DataClient {
    client: Client,
    base_url: String,
}

impl DataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    pub async fn bar_chart_data(&self) -> Result<Vec<RawBarRecord>> {
        self.fetch(Endpoint::BarChart).await
    }

    pub async fn scatter_data(&self) -> Result<Vec<RawScatterRecord>> {
        self.fetch(Endpoint::Scatter).await
    }

    pub async fn map_chart_data(&self) -> Result<Vec<RawMapRecord>> {
        self.fetch(Endpoint::MapChart).await
    }

    pub async fn geo(&self) -> Result<GeoFeatureCollection> {
        self.fetch(Endpoint::Geo).await
    }

    pub async fn animation(&self) -> Result<Vec<RawAnimationRecord>> {
        self.fetch(Endpoint::Animation).await
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = self.url(endpoint);
        debug!(%url, "fetching dataset");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| DashboardError::Http {
                endpoint: endpoint.path().to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashboardError::Status {
                endpoint: endpoint.path().to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DashboardError::Http {
                endpoint: endpoint.path().to_string(),
                source,
            })?;

        let decoded = decode(endpoint, &body)?;
        info!(endpoint = endpoint.path(), bytes = body.len(), "dataset fetched");
        Ok(decoded)
    }
}

/// Decodes a response body, tagging failures with the endpoint.
pub fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|source| DashboardError::Decode {
        endpoint: endpoint.path().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_path_without_double_slash() {
        let client = DataClient::new("http://localhost:5000/");
        assert_eq!(
            client.url(Endpoint::BarChart),
            "http://localhost:5000/api/bar-chart-data"
        );
        assert_eq!(client.url(Endpoint::Geo), "http://localhost:5000/api/geo");
    }

    #[test]
    fn decode_reports_the_endpoint() {
        let err = decode::<Vec<RawMapRecord>>(Endpoint::MapChart, b"{not json").unwrap_err();
        assert!(matches!(err, DashboardError::Decode { .. }));
        assert!(err.to_string().contains("/api/map-chart-data"));
    }

    #[test]
    fn decode_reads_map_records() {
        let body = br#"[{"gor":"London","wave":"Wave 2","hehear":1},
            {"gor":"London","wave":"Wave 2","hehear":null}]"#;
        let records: Vec<RawMapRecord> = decode(Endpoint::MapChart, body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hehear, Some(1.0));
        assert_eq!(records[1].hehear, None);
    }
}
