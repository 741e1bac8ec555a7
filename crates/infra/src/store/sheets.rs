//! Google Sheets (API v4, values resource) product store.
//!
//! Row layout: `[sku, name, price, metadata_json, added_at]`. A header row whose
//! first cell is `sku` is skipped on lookup. Rows are appended `RAW` so the sheet
//! never reinterprets a SKU like `00123` or `=A1`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use intake_core::Sku;
use intake_products::{Price, Product};

use super::{ProductStore, StoreError};

/// Public Sheets API origin.
pub const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// Spreadsheet location and credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// OAuth2 bearer token with the spreadsheets scope.
    pub access_token: String,
    /// A1 notation, e.g. `Products!A:E`.
    pub range: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl SheetsConfig {
    pub fn new(spreadsheet_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
            range: "Products!A:E".to_string(),
            base_url: SHEETS_BASE_URL.to_string(),
            timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}` with each dynamic
    /// segment percent-encoded, so `#`, `?` or `/` in a sheet name stay in the range.
    fn values_url(&self, suffix: &str) -> Result<reqwest::Url, StoreError> {
        let invalid = || StoreError::InvalidConfig(format!("invalid sheets base url: {}", self.base_url));
        let range = format!("{}{suffix}", self.range);

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);
        Ok(url)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<JsonValue>>,
}

fn cell_text(cell: Option<&JsonValue>) -> String {
    match cell {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn is_header(row: &[JsonValue]) -> bool {
    cell_text(row.first()).eq_ignore_ascii_case("sku")
}

fn row_to_product(row: &[JsonValue]) -> Option<Product> {
    let sku = Sku::parse(cell_text(row.first())).ok()?;

    let name = Some(cell_text(row.get(1))).filter(|s| !s.is_empty());
    let price = match row.get(2) {
        Some(JsonValue::Number(n)) => Some(Price::Number(n.clone())),
        other => {
            let text = cell_text(other);
            if text.is_empty() {
                None
            } else {
                Some(
                    text.parse::<serde_json::Number>()
                        .map(Price::Number)
                        .unwrap_or(Price::Text(text)),
                )
            }
        }
    };
    let metadata = match cell_text(row.get(3)) {
        s if s.is_empty() => None,
        s => Some(serde_json::from_str(&s).unwrap_or(JsonValue::String(s))),
    };

    Some(Product {
        sku,
        name,
        price,
        metadata,
    })
}

fn product_to_row(product: &Product) -> Vec<JsonValue> {
    let price = match &product.price {
        Some(Price::Number(n)) => JsonValue::Number(n.clone()),
        Some(Price::Text(s)) => JsonValue::String(s.clone()),
        None => JsonValue::String(String::new()),
    };
    let metadata = product
        .metadata
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();

    vec![
        JsonValue::String(product.sku.to_string()),
        JsonValue::String(product.display_name().to_string()),
        price,
        JsonValue::String(metadata),
        JsonValue::String(Utc::now().to_rfc3339()),
    ]
}

/// Product store backed by a Google Sheet.
#[derive(Debug, Clone)]
pub struct GoogleSheetsStore {
    config: SheetsConfig,
    http: reqwest::Client,
}

impl GoogleSheetsStore {
    pub fn new(config: SheetsConfig) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        config.values_url("")?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl ProductStore for GoogleSheetsStore {
    async fn find_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        let response = self
            .http
            .get(self.config.values_url("")?)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;
        let body = Self::read_body(response).await?;
        let range: ValueRange = serde_json::from_str(&body)?;

        let found = range
            .values
            .iter()
            .enumerate()
            .filter(|(i, row)| !(*i == 0 && is_header(row)))
            .find(|(_, row)| cell_text(row.first()) == sku.as_str())
            .and_then(|(_, row)| row_to_product(row));

        tracing::debug!(sku = %sku, rows = range.values.len(), found = found.is_some(), "sheet lookup");
        Ok(found)
    }

    async fn add_product(&self, product: &Product) -> Result<(), StoreError> {
        let body = AppendBody {
            values: vec![product_to_row(product)],
        };

        let response = self
            .http
            .post(self.config.values_url(":append")?)
            // RAW keeps cells as sent: no number/date coercion of SKUs, no formulas.
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await?;
        Self::read_body(response).await?;

        tracing::info!(sku = %product.sku, "product appended to sheet");
        Ok(())
    }
}
