use dotenv::dotenv;
use log::debug;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::fmt;

use super::endpoints::{
    FoodDetailsResponse, FoodSearchRequest, FoodSearchResponse, SearchFood, FDC_API_BASE,
};
use crate::nutrition::NutrientProfile;

#[derive(Debug)]
pub enum ApiConnectionError {
    MissingApiKey(String),
    NetworkError(reqwest::Error),
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl fmt::Display for ApiConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiConnectionError::MissingApiKey(key_name) => {
                write!(f, "API key not found in environment: {}", key_name)
            }
            ApiConnectionError::NetworkError(err) => write!(f, "Network error: {}", err),
            ApiConnectionError::ApiError { status, error_body } => {
                write!(f, "API error {}: {}", status, error_body)
            }
        }
    }
}

impl Error for ApiConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiConnectionError::NetworkError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiConnectionError {
    fn from(err: reqwest::Error) -> Self {
        ApiConnectionError::NetworkError(err)
    }
}

/// Client for the USDA FoodData Central API. Used exclusively to pre-warm
/// the nutrition cache before an optimization run; any failure here means
/// the lookup chain falls back to its tables, never that planning fails.
pub struct FdcClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl FdcClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            client: Client::new(),
            base_url: FDC_API_BASE.to_string(),
        }
    }

    /// Reads the API key from the named environment variable (a `.env`
    /// file is honored).
    pub fn from_env(api_key_env_var: &str) -> Result<Self, ApiConnectionError> {
        dotenv().ok();
        let api_key = env::var(api_key_env_var)
            .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.to_string()))?;
        Ok(Self::new(&api_key))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Searches foods by free-text query, returning candidate records.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchFood>, ApiConnectionError> {
        let url = format!("{}/foods/search", self.base_url);
        let request = FoodSearchRequest::new(query);

        let response = self
            .client
            .post(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if response.status().is_success() {
            let search_response = response.json::<FoodSearchResponse>().await?;
            debug!("FDC search '{}': {} candidates", query, search_response.foods.len());
            Ok(search_response.foods)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }

    /// Fetches the full record for one food id.
    pub async fn details(&self, fdc_id: u64) -> Result<FoodDetailsResponse, ApiConnectionError> {
        let url = format!("{}/food/{}", self.base_url, fdc_id);

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json::<FoodDetailsResponse>().await?)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::ApiError { status, error_body })
        }
    }

    /// Resolves an ingredient name to a per-100g profile: first search
    /// hit with usable macros, with a details fetch as a second chance
    /// when the search record carried none. `Ok(None)` means no usable
    /// match, which is the caller's cue to rely on fallback data.
    pub async fn lookup_profile(
        &self,
        name: &str,
    ) -> Result<Option<NutrientProfile>, ApiConnectionError> {
        let foods = self.search(name).await?;
        let Some(food) = foods.first() else {
            return Ok(None);
        };

        if let Some(profile) = food.to_profile() {
            return Ok(Some(profile));
        }
        let details = self.details(food.fdc_id).await?;
        Ok(details.to_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_error() {
        let result = FdcClient::from_env("THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
        assert!(matches!(result, Err(ApiConnectionError::MissingApiKey(_))));
        if let Err(ApiConnectionError::MissingApiKey(key_name)) = result {
            assert_eq!(key_name, "THIS_KEY_SHOULD_NOT_EXIST_IN_ENV_ABXYZ");
        }
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = FdcClient::new("test-key").with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
