use chrono::{Duration, Utc};
use log::{info, warn};
use rocket::http::{Cookie, CookieJar, SameSite, Status};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::user::User;
use crate::store::Store;

pub const SESSION_COOKIE: &str = "folio_session";

// ── Client IP request guard ──

/// Client address used for rate limiting and session records. Proxy
/// headers (leftmost `X-Forwarded-For` entry) are read only when
/// `trust_proxy` is set; otherwise the socket peer address is used.
pub struct ClientIp(pub String);

const IP_HEADERS: &[&str] = &["CF-Connecting-IP", "X-Real-IP", "X-Forwarded-For"];

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientIp {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let trust_proxy = request
            .rocket()
            .state::<AppConfig>()
            .map(|c| c.trust_proxy)
            .unwrap_or(false);
        if trust_proxy {
            let headers = request.headers();
            for name in IP_HEADERS {
                let candidate = headers
                    .get_one(name)
                    .and_then(|v| v.split(',').next())
                    .map(str::trim)
                    .filter(|v| !v.is_empty());
                if let Some(ip) = candidate {
                    return Outcome::Success(ClientIp(ip.to_string()));
                }
            }
        }
        // Socket peer; `client_ip()` would honour Rocket's `ip_header`
        let ip = request
            .remote()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        Outcome::Success(ClientIp(ip))
    }
}

/// Raw `User-Agent` header, if any.
pub struct UserAgent(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserAgent {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let ua = request.headers().get_one("User-Agent").map(|s| s.to_string());
        Outcome::Success(UserAgent(ua))
    }
}

// ── Admin guard ──

/// Guard: a signed-in admin with a live session.
/// Forwards with 401 so the catch-all can redirect to the sign-in page.
pub struct AdminUser {
    pub user: User,
    pub session_id: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let store = match request.guard::<&State<Arc<dyn Store>>>().await.succeeded() {
            Some(s) => s,
            None => return Outcome::Forward(Status::InternalServerError),
        };
        let cookies = request.cookies();
        let session_id = match cookies.get_private(SESSION_COOKIE) {
            Some(c) => c.value().to_string(),
            None => return Outcome::Forward(Status::Unauthorized),
        };
        match store.session_get_user(&session_id) {
            Some(user) => Outcome::Success(AdminUser { user, session_id }),
            None => {
                cookies.remove_private(Cookie::from(SESSION_COOKIE));
                Outcome::Forward(Status::Unauthorized)
            }
        }
    }
}

// ── Passwords ──

pub fn hash_password(password: &str) -> Result<String, String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| format!("could not hash password: {}", e))
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    matches!(bcrypt::verify(password, hash), Ok(true))
}

// ── Credential check ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    UnknownAccount,
    WrongPassword,
    Unexpected,
}

impl LoginError {
    pub fn message(&self) -> &'static str {
        match self {
            LoginError::UnknownAccount => "Account does not exist.",
            LoginError::WrongPassword => "Incorrect password. Please try again.",
            LoginError::Unexpected => "An unexpected error occurred. Please try again later.",
        }
    }
}

/// Look the user up by email and check the bcrypt hash.
pub fn authenticate(store: &dyn Store, email: &str, password: &str) -> Result<User, LoginError> {
    let user = match store.user_get_by_email(email) {
        Some(u) => u,
        None => return Err(LoginError::UnknownAccount),
    };
    if !verify_password(password, &user.password_hash) {
        return Err(LoginError::WrongPassword);
    }
    Ok(user)
}

// ── Session management ──

pub fn create_session(
    store: &dyn Store,
    user_id: i64,
    ip: Option<&str>,
    ua: Option<&str>,
) -> Result<String, String> {
    let expiry_hours = store.setting_get_i64("session_expiry_hours").max(1);
    let session_id = uuid::Uuid::new_v4().to_string();
    let expires = Utc::now().naive_utc() + Duration::hours(expiry_hours);
    let expires_str = expires.format("%Y-%m-%d %H:%M:%S").to_string();
    let ip_hash = ip.map(hash_ip);

    store.session_create(user_id, &session_id, &expires_str, ip_hash.as_deref(), ua)?;
    Ok(session_id)
}

pub fn destroy_session(store: &dyn Store, session_id: &str) -> Result<(), String> {
    store.session_delete(session_id)
}

/// HTTP-only, SameSite=Strict, private (encrypted) cookie. `Secure` when
/// the site is served over https.
pub fn set_session_cookie(cookies: &CookieJar<'_>, session_id: &str, config: &AppConfig) {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id.to_string());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    if config.public_url.starts_with("https://") {
        cookie.set_secure(true);
    }
    cookies.add_private(cookie);
}

pub fn clear_session_cookie(cookies: &CookieJar<'_>) {
    cookies.remove_private(Cookie::from(SESSION_COOKIE));
}

/// Sessions keep a digest of the client address, never the address itself.
pub fn hash_ip(ip: &str) -> String {
    hex::encode(Sha256::digest(ip.as_bytes()))
}

// ── Provisioning ──

/// Create the first admin from `FOLIO_ADMIN_EMAIL` / `FOLIO_ADMIN_PASSWORD`
/// when the users table is empty. Existing accounts are never touched.
pub fn provision_admin(store: &dyn Store, config: &AppConfig) -> Result<bool, String> {
    if store.user_count() > 0 {
        return Ok(false);
    }
    match (&config.admin_email, &config.admin_password) {
        (Some(email), Some(password)) => {
            let hash = hash_password(password)?;
            store.user_create(email, &hash, "Admin")?;
            info!("Provisioned admin account {}", email);
            Ok(true)
        }
        _ => {
            warn!("No admin account exists; set FOLIO_ADMIN_EMAIL and FOLIO_ADMIN_PASSWORD to create one");
            Ok(false)
        }
    }
}
