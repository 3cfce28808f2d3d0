//! Weather enrichment dispatch and merge
//!
//! Strategy: one batched provider request for the distinct coordinate
//! set, checked against a whole-batch cache entry first. If the batch
//! call fails, the entire call falls back to per-coordinate cache-aside
//! fetches with bounded concurrency. Every failure path resolves to the
//! canonical unknown observation, so enrichment degrades the quality of
//! the result rather than its availability.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, stream};
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::models::{
    Coordinate, CurrentWeather, EnrichedProperty, Property, dedup_coordinates,
};
use crate::weather::WeatherProvider;

/// Orchestrates cache, provider and merge for one property list.
pub struct WeatherEnricher {
    provider: Arc<dyn WeatherProvider>,
    cache: Cache,
    ttl: Duration,
    max_concurrent_fetches: usize,
}

impl WeatherEnricher {
    #[must_use]
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Cache,
        ttl: Duration,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
        }
    }

    /// Enrich every property with the current weather at its coordinate.
    ///
    /// The result has the same length and order as the input. Properties
    /// without a usable coordinate receive the unknown observation, as
    /// does (defensively) any coordinate missing from the resolved map.
    pub async fn enrich(&self, properties: &[Property]) -> Vec<EnrichedProperty> {
        let distinct = dedup_coordinates(properties);
        debug!(
            "Enriching {} properties over {} distinct coordinates",
            properties.len(),
            distinct.len()
        );

        let observations = if distinct.is_empty() {
            HashMap::new()
        } else {
            match self.batched(&distinct).await {
                Some(observations) => observations,
                None => self.per_coordinate(&distinct).await,
            }
        };

        properties
            .iter()
            .map(|property| {
                let weather = Coordinate::from_property(property)
                    .and_then(|coord| observations.get(&coord.normalized_key()).cloned())
                    .unwrap_or_else(CurrentWeather::unknown);
                EnrichedProperty {
                    property: property.clone(),
                    weather,
                }
            })
            .collect()
    }

    /// Whole-batch strategy: one cache entry and at most one provider
    /// request for the full coordinate set. Returns `None` when the
    /// batch call fails and the per-coordinate fallback must take over.
    async fn batched(
        &self,
        distinct: &[(String, Coordinate)],
    ) -> Option<HashMap<String, CurrentWeather>> {
        let batch_key = batch_cache_key(distinct);

        if let Some(pairs) = self
            .cache_get::<Vec<(String, CurrentWeather)>>(&batch_key)
            .await
        {
            debug!("Batch cache hit for {} coordinates", distinct.len());
            return Some(pairs.into_iter().collect());
        }

        let coords: Vec<Coordinate> = distinct.iter().map(|(_, coord)| *coord).collect();
        match self.provider.fetch_batch(&coords).await {
            Ok(observations) => {
                let pairs: Vec<(String, CurrentWeather)> = distinct
                    .iter()
                    .map(|(key, _)| key.clone())
                    .zip(observations)
                    .collect();
                self.cache_put(&batch_key, pairs.clone()).await;
                Some(pairs.into_iter().collect())
            }
            Err(e) => {
                warn!("Batch weather fetch failed, retrying per coordinate: {e:#}");
                None
            }
        }
    }

    /// Per-coordinate fallback: cache-aside on each coordinate key, with
    /// at most `max_concurrent_fetches` provider requests in flight
    /// across the whole call. A failed coordinate resolves to the
    /// unknown observation without disturbing the others.
    async fn per_coordinate(
        &self,
        distinct: &[(String, Coordinate)],
    ) -> HashMap<String, CurrentWeather> {
        let mut resolved = HashMap::with_capacity(distinct.len());
        let mut misses = Vec::new();

        for (key, coord) in distinct {
            match self.cache_get::<CurrentWeather>(&coord.cache_key()).await {
                Some(weather) => {
                    resolved.insert(key.clone(), weather);
                }
                None => misses.push((key.clone(), *coord)),
            }
        }
        debug!("{} coordinates cached, {} to fetch", resolved.len(), misses.len());

        let fetched: Vec<(String, CurrentWeather)> = stream::iter(misses)
            .map(|(key, coord)| async move {
                let weather = self.provider.fetch_one(&coord).await;
                // Unknown observations are cached too: the TTL doubles as
                // the retry limit for coordinates the provider cannot
                // answer right now.
                self.cache_put(&coord.cache_key(), weather.clone()).await;
                (key, weather)
            })
            .buffer_unordered(self.max_concurrent_fetches)
            .collect()
            .await;

        resolved.extend(fetched);
        resolved
    }

    /// Cache read failures degrade to a miss, so a broken cache only
    /// costs extra provider calls.
    async fn cache_get<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for {key}: {e:#}");
                None
            }
        }
    }

    /// Cache write failures degrade to a no-op.
    async fn cache_put<T>(&self, key: &str, value: T)
    where
        T: serde::Serialize + Send + std::fmt::Debug + 'static,
    {
        if let Err(e) = self.cache.put(key, value, self.ttl).await {
            warn!("Cache write failed for {key}: {e:#}");
        }
    }
}

/// Cache key covering an entire distinct coordinate set. Components are
/// sorted so the key does not depend on input order.
fn batch_cache_key(distinct: &[(String, Coordinate)]) -> String {
    let mut lats: Vec<String> = distinct.iter().map(|(_, c)| c.lat_key()).collect();
    let mut lngs: Vec<String> = distinct.iter().map(|(_, c)| c.lng_key()).collect();
    lats.sort();
    lngs.sort();
    format!("weather-batch:{}:{}", lats.join(","), lngs.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(coord: Coordinate) -> (String, Coordinate) {
        (coord.normalized_key(), coord)
    }

    #[test]
    fn test_batch_cache_key_sorts_components() {
        let forward = vec![
            keyed(Coordinate::new(11.0, 21.0)),
            keyed(Coordinate::new(10.0, 20.0)),
        ];
        let reverse = vec![
            keyed(Coordinate::new(10.0, 20.0)),
            keyed(Coordinate::new(11.0, 21.0)),
        ];

        assert_eq!(batch_cache_key(&forward), batch_cache_key(&reverse));
        assert_eq!(
            batch_cache_key(&forward),
            "weather-batch:10.000000,11.000000:20.000000,21.000000"
        );
    }
}
