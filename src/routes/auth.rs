use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;
use crate::security::auth::{self, AdminUser, ClientIp, LoginError, UserAgent};
use crate::store::Store;

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, FromForm)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn login_template(store: &dyn Store, error: Option<&str>, email: &str) -> Template {
    let context = json!({
        "page_title": "Sign in",
        "site_name": store.setting_get_or("site_name", "Portfolio"),
        "error": error,
        "email": email,
    });
    Template::render("admin/login", &context)
}

// ── Login page ─────────────────────────────────────────

/// A live session skips the form.
#[get("/signin")]
pub fn signin_page(
    admin: Option<AdminUser>,
    store: &State<Arc<dyn Store>>,
) -> Result<Template, Redirect> {
    if admin.is_some() {
        return Err(Redirect::to("/admin"));
    }
    Ok(login_template(&**store.inner(), None, ""))
}

/// `GET /admin` without a session shows the form in place of the dashboard.
#[get("/admin?<_view>", rank = 2)]
pub fn admin_signin_page(_view: Option<&str>, store: &State<Arc<dyn Store>>) -> Template {
    login_template(&**store.inner(), None, "")
}

#[post("/signin", data = "<form>")]
pub fn signin_submit(
    form: Form<LoginForm>,
    store: &State<Arc<dyn Store>>,
    config: &State<AppConfig>,
    limiter: &State<RateLimiter>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    user_agent: UserAgent,
) -> Result<Redirect, Template> {
    let s: &dyn Store = &**store.inner();
    let ip = &client_ip.0;
    let rate_key = format!("login:{}", ip);
    let max_attempts = s.setting_get_i64("login_rate_limit").max(1) as u64;

    limiter.cleanup(LOGIN_WINDOW);
    if !limiter.check_and_record(&rate_key, max_attempts, LOGIN_WINDOW) {
        log::warn!("Login rate limit hit for {}", ip);
        return Err(login_template(
            s,
            Some("Too many login attempts. Please try again in 15 minutes."),
            &form.email,
        ));
    }

    let user = match auth::authenticate(s, &form.email, &form.password) {
        Ok(u) => u,
        Err(e) => {
            log::warn!("Failed login for {}: {:?}", form.email.trim(), e);
            return Err(login_template(s, Some(e.message()), &form.email));
        }
    };

    let session_id = match auth::create_session(s, user.id, Some(ip), user_agent.0.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            log::error!("Could not create session for user {}: {}", user.id, e);
            return Err(login_template(
                s,
                Some(LoginError::Unexpected.message()),
                &form.email,
            ));
        }
    };

    auth::set_session_cookie(cookies, &session_id, config);
    if let Err(e) = s.user_touch_last_login(user.id) {
        log::warn!("Could not record last login for user {}: {}", user.id, e);
    }
    limiter.reset(&rate_key);
    log::info!("Admin {} signed in", user.email);
    Ok(Redirect::to("/admin"))
}

// ── Logout ─────────────────────────────────────────────

#[post("/admin/logout")]
pub fn logout(
    admin: Option<AdminUser>,
    store: &State<Arc<dyn Store>>,
    cookies: &CookieJar<'_>,
) -> Redirect {
    if let Some(admin) = admin {
        if let Err(e) = auth::destroy_session(&**store.inner(), &admin.session_id) {
            log::error!("Could not delete session: {}", e);
        }
        log::info!("Admin {} signed out", admin.user.email);
    }
    auth::clear_session_cookie(cookies);
    Redirect::to("/signin")
}

// ── Unauthenticated fallbacks ──────────────────────────

/// Catch-all for any /admin/* route that failed the AdminUser guard.
#[get("/admin/<_path..>", rank = 99)]
pub fn admin_redirect_get(_path: PathBuf) -> Redirect {
    Redirect::to("/signin")
}

#[post("/admin/<_path..>", rank = 99)]
pub fn admin_redirect_post(_path: PathBuf) -> Redirect {
    Redirect::to("/signin")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        signin_page,
        admin_signin_page,
        signin_submit,
        logout,
        admin_redirect_get,
        admin_redirect_post,
    ]
}
