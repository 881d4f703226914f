use std::time::Duration;

use async_trait::async_trait;
use cookcal_shared::{CalendarRecipes, DateRange, Error, MealId, Result};
use reqwest::{Client, RequestBuilder, StatusCode, Url};

use crate::{CalendarBackend, decode_data, decode_failure};

#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    pub timeout: Option<Duration>,
}

/// Calendar backend speaking the `{ code, message, data }` JSON API.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: HttpBackendConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|err| Error::Config(format!("base url {}: {err}", config.base_url)))?;

        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base url {} cannot be a base",
                config.base_url
            )));
        }

        // join() replaces the last segment unless the path ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(transport)?;

        Ok(Self {
            client,
            base_url,
            access_token: config.access_token.filter(|token| !token.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::Config(format!("endpoint {path}: {err}")))
    }

    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;

        Ok((status, body.to_vec()))
    }
}

#[async_trait]
impl CalendarBackend for HttpBackend {
    #[tracing::instrument(skip(self), fields(start = %range.start(), end = %range.end()))]
    async fn fetch_range(&self, range: &DateRange) -> Result<CalendarRecipes> {
        let mut url = self.endpoint("calendar/recipes")?;
        url.query_pairs_mut()
            .append_pair("startDate", &range.start().to_string())
            .append_pair("endDate", &range.end().to_string());

        let (status, body) = self.send(self.client.get(url)).await?;

        if !status.is_success() {
            let err = decode_failure(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), err = %err, "calendar fetch rejected");
            return Err(err);
        }

        let recipes: CalendarRecipes = decode_data(&body)?;
        tracing::debug!(meals = recipes.len(), "calendar fetched");

        Ok(recipes)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_meal(&self, meal_id: MealId) -> Result<()> {
        let url = self.endpoint(&format!("calendar/recipes/{meal_id}"))?;
        let (status, body) = self.send(self.client.delete(url)).await?;

        if !status.is_success() {
            let err = decode_failure(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), err = %err, "calendar delete rejected");
            return Err(err);
        }

        Ok(())
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(base_url: &str) -> Result<HttpBackend> {
        HttpBackend::new(HttpBackendConfig {
            base_url: base_url.to_owned(),
            access_token: Some(String::new()),
            timeout: None,
        })
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let backend = backend("https://api.cookcal.app/v1").unwrap();

        assert_eq!(
            backend.endpoint("calendar/recipes").unwrap().as_str(),
            "https://api.cookcal.app/v1/calendar/recipes"
        );
        assert!(backend.access_token.is_none());
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(backend("not a url"), Err(Error::Config(_))));
        assert!(matches!(backend("mailto:chef@cookcal.app"), Err(Error::Config(_))));
    }
}
