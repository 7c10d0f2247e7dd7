//! The `EnrichmentProvider` capability: demographic guesses from a first name.

use std::future::Future;

/// Looks up demographic attributes for a first name.
///
/// Implemented by `census-enrich` over HTTP; tests use in-memory fakes.
pub trait EnrichmentProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn age<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<u8, Self::Error>> + Send + 'a;

  fn gender<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;

  /// The most likely country code, or `None` if the provider has no match.
  fn nationality<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;
}

/// The merged result of all three lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
  pub age:         u8,
  pub gender:      String,
  pub nationality: Option<String>,
}

/// Run the three lookups in order, stopping at the first failure.
pub async fn enrich<P>(provider: &P, name: &str) -> Result<Enrichment, P::Error>
where
  P: EnrichmentProvider,
{
  let age = provider.age(name).await?;
  let gender = provider.gender(name).await?;
  let nationality = provider.nationality(name).await?;
  Ok(Enrichment { age, gender, nationality })
}
