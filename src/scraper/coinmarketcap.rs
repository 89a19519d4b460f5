use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::wrapper::http::{Client, Header, HeaderKey, Response};

use super::{Scraper, ScraperFactory};

const DEFAULT_BASE_URL: &str = "https://pro-api.coinmarketcap.com";
const DEFAULT_CONVERT: &str = "USD";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const QUOTES_PATH: &str = "/v2/cryptocurrency/quotes/latest";

#[derive(Debug, Clone, PartialEq)]
pub struct CoinMarketCapCfg {
    pub api_key: String,
    pub base_url: String,
    pub convert: String,
    pub timeout: Duration,
}

impl CoinMarketCapCfg {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            convert: DEFAULT_CONVERT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn set_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn set_convert(mut self, convert: String) -> Self {
        self.convert = convert;
        self
    }

    pub fn set_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn quotes_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), QUOTES_PATH)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct CmcStatus {
    error_code: i64,

    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CmcResponse {
    status: CmcStatus,

    #[serde(default)]
    data: Option<JsonValue>,
}

impl CmcResponse {
    fn into_quote(self, coin: &str) -> Result<JsonValue> {
        let code = self.status.error_code;
        if code != 0 {
            let reason = self
                .status
                .error_message
                .unwrap_or_else(|| format!("coinmarketcap error code {}", code));
            return Err(Error::fetch(coin, reason));
        }

        let symbol = coin.to_uppercase();
        let entry = self
            .data
            .and_then(|mut data| data.get_mut(&symbol).map(JsonValue::take));

        // v2 answers with a list per symbol, v1 with a single object
        match entry {
            Some(JsonValue::Array(items)) => items
                .into_iter()
                .next()
                .ok_or_else(|| Error::fetch(coin, "not found")),
            Some(JsonValue::Null) | None => Err(Error::fetch(coin, "not found")),
            Some(quote) => Ok(quote),
        }
    }
}

pub struct CoinMarketCapScraper {
    cli: Client,
    url: String,
    convert: String,
    closed: bool,
}

impl CoinMarketCapScraper {
    pub fn new(cfg: &CoinMarketCapCfg) -> Result<Self> {
        let mut cli = Client::with_timeout(cfg.timeout)?;
        cli.set_default_headers(vec![
            Header::new(
                HeaderKey::Custom("X-CMC_PRO_API_KEY".to_string()),
                cfg.api_key.clone(),
            ),
            Header::new(HeaderKey::Accept, "application/json".to_string()),
        ]);

        Ok(Self {
            cli,
            url: cfg.quotes_url(),
            convert: cfg.convert.clone(),
            closed: false,
        })
    }

    fn parse_quote(coin: &str, response: Response) -> Result<JsonValue> {
        // error statuses still carry the api envelope, prefer its message
        if response.status != 200 {
            if let Ok(resp) = serde_json::from_str::<CmcResponse>(&response.body) {
                if resp.status.error_code != 0 {
                    return resp.into_quote(coin);
                }
            }
        }

        let body = response.into_body()?;
        let resp: CmcResponse = serde_json::from_str(&body)?;
        resp.into_quote(coin)
    }
}

#[async_trait]
impl Scraper for CoinMarketCapScraper {
    async fn get_coin_data(&mut self, coin: &str) -> Result<JsonValue> {
        if self.closed {
            return Err(Error::ScraperError(format!(
                "coinmarketcap scraper already closed, cannot fetch {}",
                coin
            )));
        }

        let symbol = coin.to_uppercase();
        debug!("coinmarketcap: fetching quote for {}", symbol);
        let query = [("symbol", symbol.as_str()), ("convert", self.convert.as_str())];
        let response = self.cli.get(&self.url, &query, None).await?;
        Self::parse_quote(coin, response)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

pub struct CoinMarketCapFactory {
    cfg: CoinMarketCapCfg,
}

impl CoinMarketCapFactory {
    pub fn new(cfg: CoinMarketCapCfg) -> Self {
        Self { cfg }
    }
}

#[async_trait]
impl ScraperFactory for CoinMarketCapFactory {
    async fn create(&self) -> Result<Box<dyn Scraper>> {
        let scraper = CoinMarketCapScraper::new(&self.cfg)?;
        Ok(Box::new(scraper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn response(status: u16, body: &str) -> Response {
        Response {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_parse_quote_v2() {
        let body = r#"{
  "status": {"timestamp": "2024-05-02T10:00:00.000Z", "error_code": 0, "error_message": null},
  "data": {
    "BTC": [
      {"id": 1, "name": "Bitcoin", "symbol": "BTC", "quote": {"USD": {"price": 58000.12}}}
    ]
  }
}"#;
        let quote = CoinMarketCapScraper::parse_quote("btc", response(200, body)).unwrap();
        assert_eq!(quote["name"], json!("Bitcoin"));
        assert_eq!(quote["quote"]["USD"]["price"], json!(58000.12));
    }

    #[test]
    fn test_parse_quote_v1_object() {
        let body = r#"{
  "status": {"error_code": 0},
  "data": {"ETH": {"id": 1027, "symbol": "ETH"}}
}"#;
        let quote = CoinMarketCapScraper::parse_quote("ETH", response(200, body)).unwrap();
        assert_eq!(quote, json!({"id": 1027, "symbol": "ETH"}));
    }

    #[test]
    fn test_parse_quote_missing_symbol() {
        let body = r#"{"status": {"error_code": 0}, "data": {"BTC": []}}"#;
        let err = CoinMarketCapScraper::parse_quote("BTC", response(200, body)).unwrap_err();
        assert!(matches!(err, Error::FetchError { coin, reason } if coin == "BTC" && reason == "not found"));

        let body = r#"{"status": {"error_code": 0}, "data": {}}"#;
        let err = CoinMarketCapScraper::parse_quote("DOGE", response(200, body)).unwrap_err();
        assert!(matches!(err, Error::FetchError { coin, .. } if coin == "DOGE"));
    }

    #[test]
    fn test_parse_quote_api_error() {
        let body = r#"{
  "status": {"error_code": 400, "error_message": "Invalid value for \"symbol\": \"NOPE\""}
}"#;
        let err = CoinMarketCapScraper::parse_quote("NOPE", response(400, body)).unwrap_err();
        assert!(
            matches!(err, Error::FetchError { coin, reason } if coin == "NOPE" && reason.contains("Invalid value"))
        );
    }

    #[test]
    fn test_parse_quote_http_error_without_envelope() {
        let err = CoinMarketCapScraper::parse_quote("BTC", response(502, "bad gateway"))
            .unwrap_err();
        assert!(matches!(err, Error::HttpError(_)));
    }

    #[test]
    fn test_cfg_quotes_url() {
        let cfg = CoinMarketCapCfg::new("key".to_string())
            .set_base_url("https://sandbox-api.coinmarketcap.com/".to_string());
        assert_eq!(
            cfg.quotes_url(),
            "https://sandbox-api.coinmarketcap.com/v2/cryptocurrency/quotes/latest"
        );
        assert_eq!(cfg.convert, "USD");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
    }

    async fn init_server_scraper(server: &MockServer) -> Box<dyn Scraper> {
        let cfg = CoinMarketCapCfg::new("TestKey".to_string())
            .set_base_url(server.uri())
            .set_convert("EUR".to_string());
        CoinMarketCapFactory::new(cfg).create().await.unwrap()
    }

    fn quotes_mock() -> wiremock::MockBuilder {
        Mock::given(method("GET"))
            .and(path(QUOTES_PATH))
            .and(query_param("symbol", "BTC"))
            .and(query_param("convert", "EUR"))
            .and(header("X-CMC_PRO_API_KEY", "TestKey"))
            .and(header("Accept", "application/json"))
    }

    #[tokio::test]
    async fn test_get_coin_data_request() {
        let server = MockServer::start().await;
        quotes_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": {"error_code": 0, "error_message": null},
                "data": {"BTC": [{"id": 1, "symbol": "BTC"}]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut scraper = init_server_scraper(&server).await;
        let quote = scraper.get_coin_data("btc").await.unwrap();
        assert_eq!(quote, json!({"id": 1, "symbol": "BTC"}));
    }

    #[tokio::test]
    async fn test_get_coin_data_api_error() {
        let server = MockServer::start().await;
        quotes_mock()
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": {"error_code": 400, "error_message": "Invalid value for \"symbol\""}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut scraper = init_server_scraper(&server).await;
        let err = scraper.get_coin_data("BTC").await.unwrap_err();
        assert!(
            matches!(err, Error::FetchError { coin, reason } if coin == "BTC" && reason.contains("Invalid value"))
        );
    }

    #[tokio::test]
    async fn test_query_after_close() {
        let cfg = CoinMarketCapCfg::new("key".to_string());
        let factory = CoinMarketCapFactory::new(cfg);
        let mut scraper = factory.create().await.unwrap();

        scraper.close().await.unwrap();
        scraper.close().await.unwrap();
        let err = scraper.get_coin_data("BTC").await.unwrap_err();
        assert!(matches!(err, Error::ScraperError(_)));
    }
}
