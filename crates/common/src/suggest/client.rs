use super::{AddressProvider, RequestData};
use crate::{
    config::SuggestConfig,
    data::{Address, AddressList},
    error::{Error, Result},
};
use reqwest::{Client as ReqwestClient, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

const SEARCH_PATH: &str = "suggest/address";
const GEOLOCATE_PATH: &str = "geolocate/address";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    #[serde(default)]
    data: Option<SuggestionData>,
}

// The upstream sends `null` for every unknown component.
#[derive(Debug, Default, Deserialize)]
struct SuggestionData {
    #[serde(default)]
    city:    Option<String>,
    #[serde(default)]
    street:  Option<String>,
    #[serde(default)]
    house:   Option<String>,
    #[serde(default)]
    geo_lat: Option<String>,
    #[serde(default)]
    geo_lon: Option<String>,
}

impl From<SuggestionData> for Address {
    fn from(d: SuggestionData) -> Self {
        Address {
            city:   d.city.unwrap_or_default(),
            street: d.street.unwrap_or_default(),
            house:  d.house.unwrap_or_default(),
            lat:    d.geo_lat.unwrap_or_default(),
            lon:    d.geo_lon.unwrap_or_default(),
        }
    }
}

/// Client for the address suggestion API.
#[derive(Clone)]
pub struct SuggestClient {
    http:   ReqwestClient,
    config: Arc<SuggestConfig>,
}

impl SuggestClient {
    pub fn new(config: SuggestConfig) -> Result<Self> {
        let http = ReqwestClient::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    fn prepare(&self, path: &str, body: Value) -> RequestData {
        let url = format!("{}/{path}", self.config.api_base);
        let mut data = RequestData::new(url, body);
        data.token_auth(&self.config.api_key);
        if let Some(secret) = &self.config.secret_key {
            data.secret(secret.clone());
        }
        data
    }

    fn request_builder(&self, request_data: RequestData) -> RequestBuilder {
        let RequestData { url, headers, body } = request_data;
        let mut builder = self
            .http
            .post(url.as_str())
            .header("accept", "application/json");
        for (k, v) in headers {
            builder = builder.header(k, v);
        }
        builder.json(&body)
    }

    async fn suggestions(&self, path: &str, body: Value) -> Result<AddressList> {
        let request_data = self.prepare(path, body);
        debug!(url = %request_data.url, "calling suggestion api");
        let resp = self.request_builder(request_data).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "suggestion api returned an error");
            return Err(Error::InvalidResponseData(text, status.as_u16()));
        }

        let parsed: SuggestResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .suggestions
            .into_iter()
            .map(|s| Address::from(s.data.unwrap_or_default()))
            .collect())
    }
}

impl AddressProvider for SuggestClient {
    async fn search(&self, query: &str) -> Result<AddressList> {
        self.suggestions(SEARCH_PATH, json!({ "query": query }))
            .await
    }

    async fn geocode(&self, lat: f64, lng: f64) -> Result<AddressList> {
        self.suggestions(GEOLOCATE_PATH, json!({ "lat": lat, "lon": lng }))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn client_for(server: &MockServer, secret: Option<&str>) -> SuggestClient {
        SuggestClient::new(SuggestConfig {
            api_base:   server.uri(),
            api_key:    "test-key".into(),
            secret_key: secret.map(str::to_owned),
            timeout:    Duration::from_secs(2),
        })
        .unwrap()
    }

    fn moscow_body() -> Value {
        json!({
            "suggestions": [
                {
                    "value": "г Москва, ул Тверская, д 1",
                    "data": {
                        "city": "Москва",
                        "street": "Тверская",
                        "house": "1",
                        "geo_lat": "55.7575",
                        "geo_lon": "37.6135"
                    }
                },
                {
                    "value": "г Москва",
                    "data": {
                        "city": "Москва",
                        "street": null,
                        "house": null,
                        "geo_lat": "55.75",
                        "geo_lon": "37.61"
                    }
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_search() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/suggest/address"))
            .and(header("authorization", "Token test-key"))
            .and(body_json(json!({ "query": "Тверская 1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(moscow_body()))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server, None).search("Тверская 1").await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.addresses[0].city, "Москва");
        assert_eq!(list.addresses[0].house, "1");
        assert_eq!(list.addresses[0].lat, "55.7575");
        assert_eq!(list.addresses[1].street, "");
    }

    #[tokio::test]
    async fn test_geocode_sends_coordinates_and_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/geolocate/address"))
            .and(header("x-secret", "shh"))
            .and(body_json(json!({ "lat": 55.75, "lon": 37.61 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(moscow_body()))
            .expect(1)
            .mount(&server)
            .await;

        let list = client_for(&server, Some("shh"))
            .geocode(55.75, 37.61)
            .await
            .unwrap();
        assert_eq!(list.addresses[1].lon, "37.61");
    }

    #[tokio::test]
    async fn test_empty_suggestions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "suggestions": [] })))
            .mount(&server)
            .await;

        let list = client_for(&server, None).search("nowhere").await.unwrap();
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).search("x").await.unwrap_err();
        match err {
            Error::InvalidResponseData(body, status) => {
                assert_eq!(status, 403);
                assert_eq!(body, "forbidden");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).geocode(1.0, 2.0).await.unwrap_err();
        assert!(matches!(err, Error::SerdeError(_)), "{err:?}");
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_timeout_is_enforced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(moscow_body())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = SuggestClient::new(SuggestConfig {
            api_base:   server.uri(),
            api_key:    "k".into(),
            secret_key: None,
            timeout:    Duration::from_millis(100),
        })
        .unwrap();
        let err = client.search("slow").await.unwrap_err();
        assert!(matches!(err, Error::ReqwestError(ref e) if e.is_timeout()), "{err:?}");
    }
}
