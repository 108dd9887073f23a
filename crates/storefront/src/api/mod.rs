//! Pet shop REST API client.
//!
//! Uses `reqwest` 0.13 with JSON bodies. Catalog listings and breeds are
//! cached using `moka` (5-minute TTL by default); account, voucher, order and
//! appointment calls are never cached.

mod cache;

use std::sync::Arc;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use pawshop_core::{Email, OrderId, PetId, ProductId, SpeciesId};

use crate::config::StorefrontConfig;
use crate::models::{
    Appointment, AppointmentRequest, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest,
    LoginResponse, OrderDetail, OrderPayload, OrderReceipt, OrderSummary, PetListing, Profile,
    ProfileUpdate, ProductListing, RegisterRequest, ResetPasswordRequest, Species, Voucher,
};
use crate::services::{OrderService, VoucherService};

use cache::{CacheKey, CacheValue};

/// Longest plain-text error body surfaced as a server message.
const MAX_PLAIN_MESSAGE_LEN: usize = 200;

/// Errors that can occur when talking to the pet shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status}{}", .message.as_deref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api { status: u16, message: Option<String> },

    /// Bearer token missing, expired or rejected.
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Human-readable message sent by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

// =============================================================================
// PetShopClient
// =============================================================================

/// Client for the pet shop REST API.
///
/// Cloning is cheap; clones share the HTTP connection pool and catalog cache.
#[derive(Clone)]
pub struct PetShopClient {
    inner: Arc<PetShopClientInner>,
    token: Option<SecretString>,
}

struct PetShopClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl PetShopClient {
    /// Create a new unauthenticated client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .user_agent(concat!("pawshop/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(PetShopClientInner {
                client,
                base_url: config.api_base_url.clone(),
                cache,
            }),
            token: None,
        })
    }

    /// A clone that sends `token` as a bearer credential.
    #[must_use]
    pub fn with_token(&self, token: Option<SecretString>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorize(self.inner.client.get(url))
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        self.authorize(self.inner.client.post(url))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response.
    ///
    /// `401` maps to [`ApiError::Unauthorized`] and `404` to
    /// [`ApiError::NotFound`] naming `resource`.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(resource.to_string())),
            s => Err(ApiError::Api {
                status: s.as_u16(),
                message: extract_message(&body),
            }),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, ApiError> {
        let body = self.send(request, resource).await?;
        parse_body(&body, resource)
    }

    /// POST `body` without the bearer token.
    ///
    /// Every failure status, `401` included, maps to [`ApiError::Api`] carrying
    /// the server message: these endpoints reject input, not sessions.
    async fn post_public(&self, path: &str, body: &impl Serialize) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.post(url).json(body).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }
        Ok(body)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange credentials for a profile and bearer token.
    ///
    /// Both credentials are trimmed before sending.
    /// Rejected credentials surface as [`ApiError::Api`] carrying the server
    /// message rather than [`ApiError::Unauthorized`].
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let (email, password) = (email.trim(), password.trim());
        let body = self
            .post_public("Authenticate/login", &LoginRequest { email, password })
            .await?;
        parse_body(&body, "login")
    }

    /// Create an account. The caller signs in separately afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with the server message if the account is
    /// refused (e.g. the email is taken).
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest<'_>) -> Result<(), ApiError> {
        self.post_public("Authenticate/register", request).await?;
        Ok(())
    }

    /// Ask the backend to email a password reset token to `email`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses it.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &Email) -> Result<(), ApiError> {
        let request = ForgotPasswordRequest {
            email: email.as_str(),
        };
        self.post_public("Authenticate/forgot-password", &request).await?;
        Ok(())
    }

    /// Set a new password using an emailed reset token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] if the token is invalid or expired.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, request: &ResetPasswordRequest<'_>) -> Result<(), ApiError> {
        self.post_public("Authenticate/reset-password", request).await?;
        Ok(())
    }

    // =========================================================================
    // Account (requires a token)
    // =========================================================================

    /// The signed-in account's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] without a valid token.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let url = self.endpoint("Authenticate/info")?;
        self.fetch(self.get(url), "profile").await
    }

    /// Save profile edits.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the edit.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let url = self.endpoint("Authenticate/edit-info")?;
        self.send(self.post(url).json(update), "profile").await?;
        Ok(())
    }

    /// Change the signed-in account's password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] if the current password is wrong.
    #[instrument(skip_all)]
    pub async fn change_password(&self, request: &ChangePasswordRequest<'_>) -> Result<(), ApiError> {
        let url = self.endpoint("Authenticate/change-password")?;
        self.send(self.post(url).json(request), "account").await?;
        Ok(())
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// List all products.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<ProductListing>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let url = self.endpoint("DogProductItem/get-all-dog-product-item")?;
        let products: Vec<ProductListing> = self.fetch(self.get(url), "products").await?;

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<ProductListing, ApiError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let url = self.endpoint(&format!("DogProductItem/get-dog-product-item/{id}"))?;
        let product: ProductListing = self.fetch(self.get(url), &id.describe()).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// List all pets for sale.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn pets(&self) -> Result<Vec<PetListing>, ApiError> {
        if let Some(CacheValue::Pets(pets)) = self.inner.cache.get(&CacheKey::Pets).await {
            debug!("Cache hit for pets");
            return Ok(pets);
        }

        let url = self.endpoint("DogItems/get-all")?;
        let pets: Vec<PetListing> = self.fetch(self.get(url), "pets").await?;

        self.inner
            .cache
            .insert(CacheKey::Pets, CacheValue::Pets(pets.clone()))
            .await;
        Ok(pets)
    }

    /// Get a single pet.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn pet(&self, id: PetId) -> Result<PetListing, ApiError> {
        let key = CacheKey::Pet(id);
        if let Some(CacheValue::Pet(pet)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for pet");
            return Ok(*pet);
        }

        let url = self.endpoint(&format!("DogItems/get-dog/{id}"))?;
        let pet: PetListing = self.fetch(self.get(url), &id.describe()).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Pet(Box::new(pet.clone())))
            .await;
        Ok(pet)
    }

    /// List the breeds pets are grouped under.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn species(&self) -> Result<Vec<Species>, ApiError> {
        if let Some(CacheValue::Species(species)) = self.inner.cache.get(&CacheKey::Species).await {
            debug!("Cache hit for species");
            return Ok(species);
        }

        let url = self.endpoint("DogItems/get-all-species")?;
        let species: Vec<Species> = self.fetch(self.get(url), "species").await?;

        self.inner
            .cache
            .insert(CacheKey::Species, CacheValue::Species(species.clone()))
            .await;
        Ok(species)
    }

    /// List the pets of one breed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown breed.
    #[instrument(skip(self))]
    pub async fn pets_by_species(&self, id: SpeciesId) -> Result<Vec<PetListing>, ApiError> {
        let key = CacheKey::PetsBySpecies(id);
        if let Some(CacheValue::Pets(pets)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for pets by species");
            return Ok(pets);
        }

        let url = self.endpoint(&format!("DogItems/get-dog-by-specie/{id}"))?;
        let pets: Vec<PetListing> = self.fetch(self.get(url), &id.describe()).await?;

        self.inner.cache.insert(key, CacheValue::Pets(pets.clone())).await;
        Ok(pets)
    }

    /// Drop every cached catalog entry.
    pub fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Vouchers and orders (not cached)
    // =========================================================================

    /// List the vouchers currently on offer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn vouchers(&self) -> Result<Vec<Voucher>, ApiError> {
        let url = self.endpoint("Voucher/list")?;
        self.fetch(self.get(url), "vouchers").await
    }

    /// Submit an order.
    ///
    /// Any 2xx response is success. An empty body yields a default receipt.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects the order.
    #[instrument(skip(self, payload), fields(lines = payload.lines.len(), total = %payload.total))]
    pub async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ApiError> {
        let url = self.endpoint("Checkout/create")?;
        let body = self.send(self.post(url).json(payload), "checkout").await?;

        if body.trim().is_empty() {
            return Ok(OrderReceipt::default());
        }
        parse_body(&body, "checkout receipt")
    }

    /// List the orders placed by `email`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders_for(&self, email: &Email) -> Result<Vec<OrderSummary>, ApiError> {
        let encoded = urlencoding::encode(email.as_str());
        let url = self.endpoint(&format!("Checkout/list/{encoded}"))?;
        self.fetch(self.get(url), "orders").await
    }

    /// Get one order with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    #[instrument(skip(self))]
    pub async fn order_detail(&self, id: OrderId) -> Result<OrderDetail, ApiError> {
        let url = self.endpoint(&format!("Checkout/detail/{id}"))?;
        self.fetch(self.get(url), &id.describe()).await
    }

    // =========================================================================
    // Grooming appointments (not cached)
    // =========================================================================

    /// Book a grooming appointment.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend refuses the booking.
    #[instrument(skip(self, request), fields(date = %request.date, hour = %request.hour))]
    pub async fn create_appointment(&self, request: &AppointmentRequest) -> Result<(), ApiError> {
        let url = self.endpoint("Appointment/create")?;
        self.send(self.post(url).json(request), "appointment").await?;
        Ok(())
    }

    /// List the appointments booked by `email`.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn appointments_for(&self, email: &Email) -> Result<Vec<Appointment>, ApiError> {
        let encoded = urlencoding::encode(email.as_str());
        let url = self.endpoint(&format!("Appointment/all/{encoded}"))?;
        self.fetch(self.get(url), "appointments").await
    }
}

impl std::fmt::Debug for PetShopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PetShopClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VoucherService for PetShopClient {
    async fn list_vouchers(&self) -> Result<Vec<Voucher>, ApiError> {
        self.vouchers().await
    }
}

#[async_trait]
impl OrderService for PetShopClient {
    async fn create_order(&self, payload: &OrderPayload) -> Result<OrderReceipt, ApiError> {
        Self::create_order(self, payload).await
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, resource: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, resource, "Failed to parse API response");
        ApiError::Parse(format!("{resource}: {e}"))
    })
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ...}` (any casing of the key) or a short plain-text body.
fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => map
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("message"))
            .and_then(|(_, value)| value.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string),
        Ok(serde_json::Value::String(message)) if !message.trim().is_empty() => {
            Some(message.trim().to_string())
        }
        Ok(_) => None,
        Err(_) if body.len() <= MAX_PLAIN_MESSAGE_LEN && !body.starts_with('<') => {
            Some(body.to_string())
        }
        Err(_) => None,
    }
}
