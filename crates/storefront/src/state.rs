//! The shopper's storefront context.

use std::sync::Arc;

use pawshop_core::{Email, OrderId, PetId, Price, ProductId, SpeciesId};

use crate::api::PetShopClient;
use crate::cart::{CartStore, LineItem};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::models::{
    Appointment, AppointmentRequest, CatalogEntry, Identity, OrderDetail, OrderSummary, PetListing,
    Profile,
};
use crate::services::account::parse_email;
use crate::services::{
    AccountError, Booking, Checkout, CustomerDetails, OrderConfirmation, PasswordChange,
    PasswordReset, ProfileChanges, Registration,
};
use crate::session::Session;
use crate::storage::{FileStore, KeyValueStore};

/// Result of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Discount taken off the subtotal.
    pub discount: Price,
    pub confirmation: OrderConfirmation,
}

/// Everything one shopper's actions need: configuration, the API client,
/// the cart and the session, all sharing one key-value storage.
pub struct Storefront {
    config: StorefrontConfig,
    client: PetShopClient,
    cart: CartStore,
    session: Session,
}

impl Storefront {
    /// Open the storefront with file-backed storage under `config.data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the HTTP
    /// client cannot be built.
    pub fn open(config: StorefrontConfig) -> Result<Self> {
        let storage = Arc::new(FileStore::open(config.data_dir.clone())?);
        Self::with_storage(config, storage)
    }

    /// Open the storefront over an arbitrary storage backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let client = PetShopClient::new(&config)?;
        let cart = CartStore::open(Arc::clone(&storage));
        let session = Session::restore(storage);

        Ok(Self {
            config,
            client,
            cart,
            session,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// API client carrying the current bearer token, if any.
    #[must_use]
    pub fn client(&self) -> PetShopClient {
        self.client.with_token(self.session.token().cloned())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session
    /// cannot be stored.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity> {
        let response = self.client.login(email, password).await?;
        let (identity, token) = response.into_parts();
        self.session.sign_in(identity.clone(), token)?;
        set_sentry_user(&identity.email, identity.username.as_deref());
        Ok(identity)
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session cannot be erased.
    pub fn logout(&mut self) -> Result<()> {
        clear_sentry_user();
        self.session.sign_out()?;
        Ok(())
    }

    /// Email of the signed-in shopper.
    fn account_email(&self) -> Result<Email> {
        self.session
            .identity()
            .filter(|_| self.session.is_authenticated())
            .map(|identity| identity.email.clone())
            .ok_or(AppError::SignInRequired)
    }

    /// Sign out if `result` says the backend rejected the token.
    fn expire_on_unauthorized<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result
            && err.is_unauthorized()
            && self.session.token().is_some()
        {
            tracing::warn!("bearer token rejected, signing out");
            if let Err(e) = self.logout() {
                tracing::warn!(error = %e, "could not erase expired session");
            }
        }
        result
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Create an account. The shopper signs in separately afterwards.
    ///
    /// # Errors
    ///
    /// Returns the form error, or the backend's refusal (e.g. email taken).
    pub async fn register(&self, form: &Registration) -> Result<()> {
        let request = form.request()?;
        self.client.register(&request).await?;
        tracing::info!(email = %request.email, "account registered");
        Ok(())
    }

    /// Ask for a password reset email. Returns the address it goes to.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank or malformed email, or the API failure.
    pub async fn forgot_password(&self, email: &str) -> Result<Email> {
        let email = parse_email(email)?;
        self.client.forgot_password(&email).await?;
        Ok(email)
    }

    /// Set a new password with the token from the reset email.
    ///
    /// # Errors
    ///
    /// Returns the form error, or the backend's refusal of the token.
    pub async fn reset_password(&self, form: &PasswordReset) -> Result<()> {
        let request = form.request()?;
        self.client.reset_password(&request).await?;
        Ok(())
    }

    /// The signed-in shopper's saved profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, or the API failure.
    pub async fn profile(&mut self) -> Result<Profile> {
        self.account_email()?;
        let result = self.client().profile().await.map_err(AppError::from);
        self.expire_on_unauthorized(result)
    }

    /// Save profile edits and refresh the stored identity with them.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out,
    /// [`AccountError::NoChanges`] for an empty edit, or the API failure.
    pub async fn update_profile(&mut self, changes: &ProfileChanges) -> Result<Identity> {
        self.account_email()?;
        if changes.is_empty() {
            return Err(AccountError::NoChanges.into());
        }

        let client = self.client();
        let result = async {
            let profile = client.profile().await?;
            let update = changes.update_for(&profile)?;
            client.update_profile(&update).await?;
            Ok::<_, AppError>(update)
        }
        .await;
        let update = self.expire_on_unauthorized(result)?;

        let mut identity = self
            .session
            .identity()
            .cloned()
            .ok_or(AppError::SignInRequired)?;
        identity.apply(&update);
        self.session.update_identity(identity.clone())?;
        Ok(identity)
    }

    /// Change the signed-in shopper's password. The session stays signed in.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, the form error, or
    /// the backend's refusal (e.g. a wrong current password).
    pub async fn change_password(&mut self, form: &PasswordChange) -> Result<()> {
        self.account_email()?;
        let request = form.request()?;
        let result = self
            .client()
            .change_password(&request)
            .await
            .map_err(AppError::from);
        self.expire_on_unauthorized(result)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Pets for sale, optionally narrowed to one breed, matching `search` on
    /// name or description.
    ///
    /// # Errors
    ///
    /// Returns the API failure.
    pub async fn browse_pets(
        &self,
        species: Option<SpeciesId>,
        search: &str,
    ) -> Result<Vec<PetListing>> {
        let client = self.client();
        let pets = match species {
            Some(id) => client.pets_by_species(id).await?,
            None => client.pets().await?,
        };
        Ok(pets
            .into_iter()
            .filter(|pet| pet.matches_search(search))
            .collect())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Look a product up and add one unit of it to the cart.
    ///
    /// Returns the resulting cart line, or `None` if the product is out of stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be fetched.
    pub async fn add_product(&mut self, id: ProductId) -> Result<Option<LineItem>> {
        let listing = self.client().product(id).await.map_err(AppError::from);
        let listing = self.expire_on_unauthorized(listing)?;
        self.cart.add(&CatalogEntry::from(listing));
        let product_id = id.to_string();
        let data: &[(&str, &str)] = &[("product_id", &product_id)];
        add_breadcrumb("cart", "Added product", Some(data));
        Ok(self.cart.get(id).cloned())
    }

    /// Look a pet up and put it in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the pet cannot be fetched.
    pub async fn add_pet(&mut self, id: PetId) -> Result<Option<LineItem>> {
        let listing = self.client().pet(id).await.map_err(AppError::from);
        let listing = self.expire_on_unauthorized(listing)?;
        self.cart.add(&CatalogEntry::from(listing));
        let pet_id = id.to_string();
        let data: &[(&str, &str)] = &[("pet_id", &pet_id)];
        add_breadcrumb("cart", "Added pet", Some(data));
        Ok(self.cart.get(id).cloned())
    }

    // =========================================================================
    // Checkout and orders
    // =========================================================================

    /// Apply `voucher` (if given) and place the order.
    ///
    /// An empty cart or a signed-out session fails before anything is
    /// fetched. An invalid voucher aborts before the order is sent.
    ///
    /// # Errors
    ///
    /// Returns the checkout failure; an expired token also signs out.
    pub async fn checkout(
        &mut self,
        details: &CustomerDetails,
        voucher: Option<&str>,
    ) -> Result<CheckoutOutcome> {
        Checkout::ready(&self.cart, &self.session)?;
        add_breadcrumb("checkout", "Submitting order", None);
        let client = self.client();
        let mut checkout = Checkout::new(&client, &client);

        let result = async {
            let discount = match voucher {
                Some(code) => checkout.apply_voucher_code(code, &self.cart).await?,
                None => Price::ZERO,
            };
            let confirmation = checkout
                .submit_order(details, &mut self.cart, &self.session)
                .await?;
            Ok::<_, AppError>(CheckoutOutcome {
                discount,
                confirmation,
            })
        }
        .await;

        self.expire_on_unauthorized(result)
    }

    /// Orders placed by the signed-in shopper.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, or the API failure.
    pub async fn orders(&mut self) -> Result<Vec<OrderSummary>> {
        let email = self.account_email()?;
        let result = self.client().orders_for(&email).await.map_err(AppError::from);
        self.expire_on_unauthorized(result)
    }

    /// One order with its lines.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, or the API failure.
    pub async fn order(&mut self, id: OrderId) -> Result<OrderDetail> {
        if !self.session.is_authenticated() {
            return Err(AppError::SignInRequired);
        }
        let result = self.client().order_detail(id).await.map_err(AppError::from);
        self.expire_on_unauthorized(result)
    }

    // =========================================================================
    // Grooming appointments
    // =========================================================================

    /// Book a grooming appointment for the signed-in shopper.
    ///
    /// Returns the booking as sent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, the booking error,
    /// or the API failure.
    pub async fn book_appointment(&mut self, booking: &Booking) -> Result<AppointmentRequest> {
        let email = self.account_email()?;
        let today = chrono::Local::now().date_naive();
        let request = booking.request(&email, today)?;

        add_breadcrumb("grooming", "Booking appointment", None);
        let result = self
            .client()
            .create_appointment(&request)
            .await
            .map_err(AppError::from);
        self.expire_on_unauthorized(result)?;
        tracing::info!(date = %request.date, hour = %request.hour, "appointment booked");
        Ok(request)
    }

    /// Appointments booked by the signed-in shopper.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::SignInRequired`] when signed out, or the API failure.
    pub async fn appointments(&mut self) -> Result<Vec<Appointment>> {
        let email = self.account_email()?;
        let result = self
            .client()
            .appointments_for(&email)
            .await
            .map_err(AppError::from);
        self.expire_on_unauthorized(result)
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("client", &self.client)
            .field("cart", &self.cart)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::services::CheckoutError;
    use crate::storage::{MemoryStore, TOKEN_KEY};

    fn storefront(store: Arc<MemoryStore>) -> Storefront {
        // Port 9 (discard) so any accidental request fails fast
        let config = StorefrontConfig::from_lookup(|key| {
            (key == "PAWS_API_BASE_URL").then(|| "http://127.0.0.1:9/api".to_string())
        })
        .unwrap();
        Storefront::with_storage(config, store).unwrap()
    }

    fn identity() -> Identity {
        serde_json::from_str(r#"{"email": "an@example.com", "username": "an"}"#).unwrap()
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_fails_locally() {
        let mut storefront = storefront(Arc::new(MemoryStore::new()));
        let details = CustomerDetails::default();

        let err = storefront.checkout(&details, None).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));

        // The voucher is never looked up; port 9 would fail the lookup
        let err = storefront.checkout(&details, Some("NOPE")).await.unwrap_err();
        assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
    }

    #[tokio::test]
    async fn test_orders_require_sign_in() {
        let mut storefront = storefront(Arc::new(MemoryStore::new()));
        assert!(matches!(
            storefront.orders().await.unwrap_err(),
            AppError::SignInRequired
        ));
        assert!(matches!(
            storefront.order(OrderId::new(1)).await.unwrap_err(),
            AppError::SignInRequired
        ));
    }

    #[tokio::test]
    async fn test_account_actions_require_sign_in() {
        let mut storefront = storefront(Arc::new(MemoryStore::new()));
        assert!(matches!(
            storefront.profile().await.unwrap_err(),
            AppError::SignInRequired
        ));
        assert!(matches!(
            storefront.appointments().await.unwrap_err(),
            AppError::SignInRequired
        ));

        let today = chrono::Local::now().date_naive();
        let booking = Booking::prefill(&identity(), 1, "Milo", today);
        assert!(matches!(
            storefront.book_appointment(&booking).await.unwrap_err(),
            AppError::SignInRequired
        ));

        let change = PasswordChange {
            current: SecretString::from("old-pass"),
            new: SecretString::from("new-pass"),
            confirm: SecretString::from("new-pass"),
        };
        assert!(matches!(
            storefront.change_password(&change).await.unwrap_err(),
            AppError::SignInRequired
        ));
    }

    #[tokio::test]
    async fn test_bad_forms_fail_before_any_request() {
        let mut storefront = storefront(Arc::new(MemoryStore::new()));
        storefront
            .session
            .sign_in(identity(), SecretString::from("jwt"))
            .unwrap();

        // Port 9 would fail any request, so these errors are local
        let err = storefront
            .update_profile(&ProfileChanges::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Account(AccountError::NoChanges)));

        let reset = PasswordReset {
            token: "tok".to_owned(),
            new: SecretString::from("short"),
            confirm: SecretString::from("short"),
        };
        let err = storefront.reset_password(&reset).await.unwrap_err();
        assert!(matches!(err, AppError::Account(AccountError::PasswordTooShort)));

        let err = storefront.forgot_password("  ").await.unwrap_err();
        assert!(matches!(err, AppError::Account(AccountError::MissingField("email"))));

        let mut booking = Booking::prefill(&identity(), 1, "Milo", chrono::Local::now().date_naive());
        booking.time = "23:00".to_owned();
        let err = storefront.book_appointment(&booking).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Booking(crate::services::BookingError::UnavailableTime(_))
        ));
        assert!(storefront.session().is_authenticated());
    }

    #[test]
    fn test_session_is_restored_from_shared_storage() {
        let store = Arc::new(MemoryStore::new());
        {
            let storage: Arc<dyn KeyValueStore> = store.clone();
            let mut session = Session::new(storage);
            session
                .sign_in(identity(), SecretString::from("jwt"))
                .unwrap();
        }

        let mut storefront = storefront(store.clone());
        assert!(storefront.session().is_authenticated());
        assert!(format!("{:?}", storefront.client()).contains("[REDACTED]"));

        storefront.logout().unwrap();
        assert!(!storefront.session().is_authenticated());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_expire_on_unauthorized_signs_out() {
        let store = Arc::new(MemoryStore::new());
        let mut storefront = storefront(store);
        storefront
            .session
            .sign_in(identity(), SecretString::from("jwt"))
            .unwrap();

        let result: Result<()> = Err(AppError::Api(crate::api::ApiError::Unauthorized));
        assert!(storefront.expire_on_unauthorized(result).is_err());
        assert!(!storefront.session().is_authenticated());
    }
}
