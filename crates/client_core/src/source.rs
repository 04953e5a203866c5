use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Profile,
    protocol::{RandomUserEnvelope, RandomUserResponse},
};
use tracing::debug;

use crate::config::Settings;

/// Anything that can hand out a batch of profiles.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_batch(&self, count: usize) -> Result<Vec<Profile>>;
}

pub struct RandomUserClient {
    http: Client,
    api_url: String,
    seed: Option<String>,
    nationalities: Option<String>,
}

impl RandomUserClient {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_url: api_url.into(),
            seed: None,
            nationalities: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            seed: settings.seed.clone(),
            nationalities: settings.nationalities.clone(),
            ..Self::new(settings.api_url.clone())
        }
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    fn query(&self, count: usize) -> Vec<(&'static str, String)> {
        let mut query = vec![("results", count.to_string())];
        if let Some(seed) = &self.seed {
            query.push(("seed", seed.clone()));
        }
        if let Some(nat) = &self.nationalities {
            query.push(("nat", nat.clone()));
        }
        query
    }
}

#[async_trait]
impl ProfileSource for RandomUserClient {
    async fn fetch_batch(&self, count: usize) -> Result<Vec<Profile>> {
        debug!(api_url = %self.api_url, count, "requesting profile batch");
        let envelope: RandomUserEnvelope = self
            .http
            .get(&self.api_url)
            .query(&self.query(count))
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.api_url))?
            .error_for_status()?
            .json()
            .await
            .context("malformed profile payload")?;

        match envelope {
            RandomUserEnvelope::Batch(RandomUserResponse { results, .. }) => {
                Ok(results.into_iter().map(Profile::from).collect())
            }
            RandomUserEnvelope::Error { error } => Err(anyhow!("profile api error: {error}")),
        }
    }
}

#[cfg(test)]
#[path = "tests/source_tests.rs"]
mod tests;
