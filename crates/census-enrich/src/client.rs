//! Async HTTP client for the three name-prediction APIs.

use census_core::enrich::EnrichmentProvider;
use reqwest::{Client, header};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Api, Error, Result};

/// Base URLs of the lookup APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichConfig {
  pub age_url:         String,
  pub gender_url:      String,
  pub nationality_url: String,
}

impl Default for EnrichConfig {
  fn default() -> Self {
    Self {
      age_url:         "https://api.agify.io".to_owned(),
      gender_url:      "https://api.genderize.io".to_owned(),
      nationality_url: "https://api.nationalize.io".to_owned(),
    }
  }
}

// ─── Response bodies ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct AgeBody {
  age: Option<u8>,
}

#[derive(Deserialize)]
struct GenderBody {
  gender: Option<String>,
}

#[derive(Deserialize)]
struct Country {
  country_id: String,
}

#[derive(Deserialize)]
struct NationalityBody {
  #[serde(default)]
  country: Vec<Country>,
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Enrichment provider backed by HTTP lookups.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and pools
/// connections. No per-call timeout is set; cancellation comes from the
/// caller dropping the future.
#[derive(Clone)]
pub struct HttpEnricher {
  client: Client,
  config: EnrichConfig,
}

impl HttpEnricher {
  pub fn new(config: EnrichConfig) -> Result<Self> {
    let client = Client::builder().build().map_err(Error::Client)?;
    Ok(Self { client, config })
  }

  fn base_url(&self, api: Api) -> &str {
    match api {
      Api::Age => &self.config.age_url,
      Api::Gender => &self.config.gender_url,
      Api::Nationality => &self.config.nationality_url,
    }
  }

  /// `GET <base>?name=<name>` and decode the JSON body.
  async fn lookup<T: DeserializeOwned>(&self, api: Api, name: &str) -> Result<T> {
    let url = self.base_url(api);
    let resp = self
      .client
      .get(url)
      .query(&[("name", name)])
      .header(header::ACCEPT, "application/json")
      .send()
      .await
      .map_err(|source| Error::Request { api, source })?;

    let status = resp.status();
    tracing::debug!(%api, url, name, status = status.as_u16(), "sent lookup request");

    if !status.is_success() {
      return Err(Error::Status { api, status });
    }
    resp.json().await.map_err(|source| Error::Decode { api, source })
  }
}

impl EnrichmentProvider for HttpEnricher {
  type Error = Error;

  async fn age(&self, name: &str) -> Result<u8> {
    let body: AgeBody = self.lookup(Api::Age, name).await?;
    body
      .age
      .ok_or_else(|| Error::NoPrediction { api: Api::Age, name: name.to_owned() })
  }

  async fn gender(&self, name: &str) -> Result<String> {
    let body: GenderBody = self.lookup(Api::Gender, name).await?;
    body
      .gender
      .ok_or_else(|| Error::NoPrediction { api: Api::Gender, name: name.to_owned() })
  }

  /// The provider lists candidate countries most likely first.
  async fn nationality(&self, name: &str) -> Result<Option<String>> {
    let body: NationalityBody = self.lookup(Api::Nationality, name).await?;
    Ok(body.country.into_iter().next().map(|c| c.country_id))
  }
}
