//! Integration tests for Paws & Co.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pawshop-integration-tests
//! ```
//!
//! The tests run the storefront against [`StubShop`], an in-process `axum`
//! server on `127.0.0.1` that speaks the pet shop REST API from canned data.
//! No external services are needed.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pawshop_storefront::config::{ConfigError, StorefrontConfig};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::Mutex;

/// Password the stub accepts for every account.
pub const PASSWORD: &str = "meo-meo-123";

/// Bearer token the stub issues and expects.
pub const TOKEN: &str = "stub-jwt-token";

/// The only password reset token the stub accepts.
pub const RESET_TOKEN: &str = "reset-token-42";

/// Email of the account the stub already knows about.
pub const KNOWN_EMAIL: &str = "an@example.com";

/// Canned data and recorded traffic of a [`StubShop`].
#[derive(Debug, Default)]
pub struct ShopData {
    pub products: Vec<Value>,
    pub pets: Vec<Value>,
    pub vouchers: Vec<Value>,
    /// Order history rows returned by `Checkout/list`.
    pub history: Vec<Value>,
    /// Bodies received by `Checkout/create`.
    pub submitted: Vec<Value>,
    /// When set, `Checkout/create` answers with this status and message.
    pub reject_orders: Option<(u16, Option<String>)>,
    /// When set, every authenticated route answers 401.
    pub token_revoked: bool,
    /// Number of requests served by the product list route.
    pub product_list_hits: usize,
    /// Emails passed to `Checkout/list`, as decoded by the router.
    pub history_lookups: Vec<String>,
    /// Number of requests served by the voucher list route.
    pub voucher_list_hits: usize,
    pub species: Vec<Value>,
    /// Bodies received by `Authenticate/register`.
    pub registrations: Vec<Value>,
    /// Returned by `Authenticate/info`.
    pub profile: Value,
    /// Bodies received by `Authenticate/edit-info`.
    pub profile_edits: Vec<Value>,
    /// Bodies received by `Authenticate/change-password`.
    pub password_changes: Vec<Value>,
    /// Emails received by `Authenticate/forgot-password`.
    pub reset_requests: Vec<String>,
    /// New passwords accepted by `Authenticate/reset-password`.
    pub password_resets: Vec<String>,
    /// Bodies received by `Appointment/create`.
    pub booked: Vec<Value>,
}

/// A running stub of the pet shop API.
#[derive(Debug, Clone)]
pub struct StubShop {
    addr: SocketAddr,
    data: Arc<Mutex<ShopData>>,
}

impl StubShop {
    /// Start a stub on an ephemeral port with the default catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with(default_data()).await
    }

    /// Start a stub serving `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start_with(data: ShopData) -> std::io::Result<Self> {
        let data = Arc::new(Mutex::new(data));
        let app = router(Arc::clone(&data));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            // Runs until the test runtime shuts down
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, data })
    }

    /// `http://127.0.0.1:<port>/api`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Storefront configuration pointing at this stub.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is rejected.
    pub fn config(&self, data_dir: &std::path::Path) -> Result<StorefrontConfig, ConfigError> {
        let base_url = self.base_url();
        let data_dir = data_dir.display().to_string();
        StorefrontConfig::from_lookup(|key| match key {
            "PAWS_API_BASE_URL" => Some(base_url.clone()),
            "PAWS_DATA_DIR" => Some(data_dir.clone()),
            _ => None,
        })
    }

    /// Lock the stub's data for inspection or changes.
    pub async fn data(&self) -> tokio::sync::MutexGuard<'_, ShopData> {
        self.data.lock().await
    }
}

/// Two products (one sold out), two pets of two breeds, two vouchers and the
/// profile of the known account.
#[must_use]
pub fn default_data() -> ShopData {
    ShopData {
        products: vec![
            json!({
                "dogProductItemId": 1,
                "itemName": "Royal Canin Mini Adult 2kg",
                "price": 250000,
                "images": ["https://img.example.com/rc-mini.jpg"],
                "quantity": 5,
                "category": "Thức ăn"
            }),
            json!({
                "dogProductItemId": 2,
                "itemName": "Dây dắt chó",
                "price": 120000,
                "images": null,
                "quantity": 0,
                "category": "Phụ kiện"
            }),
        ],
        pets: vec![
            json!({
                "dogItemId": 4,
                "dogName": "Milo",
                "price": 5000000,
                "images": ["https://img.example.com/milo.jpg"],
                "dogSpeciesId": 2,
                "dogSpeciesName": "Corgi",
                "description": "Corgi 3 tháng tuổi, rất thân thiện"
            }),
            json!({
                "dogItemId": 7,
                "dogName": "Mochi",
                "price": 3500000,
                "images": null,
                "dogSpeciesId": 11,
                "dogSpeciesName": "Mèo Anh lông ngắn",
                "description": "Bé mèo lông xám, đã tiêm phòng"
            }),
        ],
        species: vec![
            json!({ "dogSpeciesId": 2, "dogSpeciesName": "Corgi" }),
            json!({ "dogSpeciesId": 5, "dogSpeciesName": "Poodle" }),
            json!({ "dogSpeciesId": 11, "dogSpeciesName": "Mèo Anh lông ngắn" }),
        ],
        profile: json!({
            "id": "u-1",
            "email": KNOWN_EMAIL,
            "userName": "an",
            "firstName": "An",
            "lastName": "Nguyen",
            "phoneNumber": "0901234567",
            "avatarUrl": null
        }),
        vouchers: vec![
            json!({ "code": "SALE10", "discountPercent": 10 }),
            json!({ "code": "ZERO", "discountPercent": 0 }),
        ],
        ..ShopData::default()
    }
}

type Shared = Arc<Mutex<ShopData>>;

fn router(data: Shared) -> Router {
    Router::new()
        .route("/api/Authenticate/login", post(login))
        .route("/api/Authenticate/register", post(register))
        .route("/api/Authenticate/forgot-password", post(forgot_password))
        .route("/api/Authenticate/reset-password", post(reset_password))
        .route("/api/Authenticate/info", get(profile))
        .route("/api/Authenticate/edit-info", post(edit_profile))
        .route("/api/Authenticate/change-password", post(change_password))
        .route("/api/DogProductItem/get-all-dog-product-item", get(list_products))
        .route("/api/DogProductItem/get-dog-product-item/{id}", get(get_product))
        .route("/api/DogItems/get-all", get(list_pets))
        .route("/api/DogItems/get-dog/{id}", get(get_pet))
        .route("/api/DogItems/get-all-species", get(list_species))
        .route("/api/DogItems/get-dog-by-specie/{id}", get(pets_by_species))
        .route("/api/Voucher/list", get(list_vouchers))
        .route("/api/Checkout/create", post(create_order))
        .route("/api/Checkout/list/{email}", get(order_history))
        .route("/api/Checkout/detail/{id}", get(order_detail))
        .route("/api/Appointment/create", post(create_appointment))
        .route("/api/Appointment/all/{email}", get(appointments_for))
        .with_state(data)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

/// The request carries the issued token and it has not been revoked.
fn authorized(headers: &HeaderMap, data: &ShopData) -> bool {
    let expected = format!("Bearer {TOKEN}");
    !data.token_revoked
        && headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
}

fn find_by(items: &[Value], field: &str, id: i32) -> Option<Value> {
    items
        .iter()
        .find(|item| item[field].as_i64() == Some(i64::from(id)))
        .cloned()
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.password != PASSWORD {
        return message(StatusCode::UNAUTHORIZED, "Sai email hoặc mật khẩu");
    }
    Json(json!({
        "token": TOKEN,
        "username": "an",
        "email": body.email,
        "role": "User",
        "firstName": "An",
        "lastName": "Nguyen",
        "phoneNumber": "0901234567"
    }))
    .into_response()
}

async fn register(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = data.lock().await;
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    let taken = email == KNOWN_EMAIL
        || data
            .registrations
            .iter()
            .any(|account| account["email"].as_str() == Some(email.as_str()));
    if taken {
        return message(StatusCode::BAD_REQUEST, "Email đã tồn tại");
    }
    data.registrations.push(body);
    message(StatusCode::OK, "Đăng ký thành công")
}

async fn forgot_password(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    data.lock().await.reset_requests.push(email);
    message(StatusCode::OK, "Đã gửi email đặt lại mật khẩu")
}

async fn reset_password(State(data): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["token"].as_str() != Some(RESET_TOKEN) {
        return message(StatusCode::BAD_REQUEST, "Token không hợp lệ hoặc đã hết hạn");
    }
    let password = body["newPassword"].as_str().unwrap_or_default().to_owned();
    data.lock().await.password_resets.push(password);
    message(StatusCode::OK, "Đặt lại mật khẩu thành công")
}

async fn profile(State(data): State<Shared>, headers: HeaderMap) -> Response {
    let data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(data.profile.clone()).into_response()
}

async fn edit_profile(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    for (field, key) in [
        ("FirstName", "firstName"),
        ("LastName", "lastName"),
        ("PhoneNumber", "phoneNumber"),
        ("AvatarUrl", "avatarUrl"),
    ] {
        data.profile[key] = body[field].clone();
    }
    data.profile_edits.push(body);
    message(StatusCode::OK, "Cập nhật thành công")
}

async fn change_password(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["CurrentPassword"].as_str() != Some(PASSWORD) {
        return message(StatusCode::BAD_REQUEST, "Mật khẩu hiện tại không đúng");
    }
    data.password_changes.push(body);
    message(StatusCode::OK, "Đổi mật khẩu thành công")
}

async fn list_products(State(data): State<Shared>) -> Response {
    let mut data = data.lock().await;
    data.product_list_hits += 1;
    Json(Value::Array(data.products.clone())).into_response()
}

async fn get_product(State(data): State<Shared>, Path(id): Path<i32>) -> Response {
    let data = data.lock().await;
    find_by(&data.products, "dogProductItemId", id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}

async fn list_pets(State(data): State<Shared>) -> Response {
    Json(Value::Array(data.lock().await.pets.clone())).into_response()
}

async fn get_pet(State(data): State<Shared>, Path(id): Path<i32>) -> Response {
    let data = data.lock().await;
    find_by(&data.pets, "dogItemId", id).map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |pet| Json(pet).into_response(),
    )
}

async fn list_species(State(data): State<Shared>) -> Response {
    Json(Value::Array(data.lock().await.species.clone())).into_response()
}

async fn pets_by_species(State(data): State<Shared>, Path(id): Path<i32>) -> Response {
    let data = data.lock().await;
    if find_by(&data.species, "dogSpeciesId", id).is_none() {
        return message(StatusCode::NOT_FOUND, "Không tìm thấy giống");
    }
    let pets = data
        .pets
        .iter()
        .filter(|pet| pet["dogSpeciesId"].as_i64() == Some(i64::from(id)))
        .cloned()
        .collect();
    Json(Value::Array(pets)).into_response()
}

async fn list_vouchers(State(data): State<Shared>) -> Response {
    let mut data = data.lock().await;
    data.voucher_list_hits += 1;
    Json(Value::Array(data.vouchers.clone())).into_response()
}

async fn create_order(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if let Some((status, text)) = data.reject_orders.clone() {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
        return match text {
            Some(text) => message(status, &text),
            None => status.into_response(),
        };
    }

    data.submitted.push(body);
    let id = 100 + data.submitted.len();
    Json(json!({ "status": 201, "id": id, "message": "Đặt hàng thành công" })).into_response()
}

async fn order_history(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    let mut data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    data.history_lookups.push(email);
    Json(Value::Array(data.history.clone())).into_response()
}

async fn order_detail(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i32>,
) -> Response {
    let data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    find_by(&data.history, "id", id).map_or_else(
        || message(StatusCode::NOT_FOUND, "Không tìm thấy đơn hàng"),
        |order| Json(order).into_response(),
    )
}

async fn create_appointment(
    State(data): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    data.booked.push(body);
    message(StatusCode::OK, "Đặt lịch thành công")
}

/// Bookings by `email`, in the history shape the backend returns.
async fn appointments_for(
    State(data): State<Shared>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Response {
    let data = data.lock().await;
    if !authorized(&headers, &data) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let rows = data
        .booked
        .iter()
        .zip(1..)
        .filter(|(body, _)| body["User_id"].as_str() == Some(email.as_str()))
        .map(|(body, id)| {
            json!({
                "appointment_id": id,
                "service": body["Service"],
                "user_name": body["User_name"],
                "date": format!("{}T00:00:00", body["Date"].as_str().unwrap_or_default()),
                "hour": body["Hour"],
                "status": body["Status"],
                "phone_number": body["Phone_number"],
                "description": body["Description"]
            })
        })
        .collect();
    Json(Value::Array(rows)).into_response()
}
