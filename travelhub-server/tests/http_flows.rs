//! End-to-end page flows against the in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use travelhub_core::AppConfig;
use travelhub_server::auth::PasswordHasher;
use travelhub_server::store::MemoryStore;
use travelhub_server::{build_router, AppState};

const BOUNDARY: &str = "travelhub-test-boundary";

struct TestApp {
    router: Router,
    state: AppState,
    static_dir: TempDir,
}

fn test_app() -> TestApp {
    let static_dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.auth.secret_key = Some("test-secret".into());
    config.uploads.static_dir = static_dir.path().to_path_buf();

    let params = argon2::Params::new(8, 1, 1, None).unwrap();
    let hasher = PasswordHasher::with_params("test-secret", params);
    let state = AppState::new(Arc::new(MemoryStore::new()), config, hasher);

    TestApp {
        router: build_router(state.clone()),
        state,
        static_dir,
    }
}

impl TestApp {
    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, c);
        }
        self.send(builder.body(Body::from(body.to_owned())).unwrap())
            .await
    }

    async fn post_multipart(&self, uri: &str, body: Vec<u8>, cookie: &str) -> Response<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::COOKIE, cookie)
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn signup(&self, username: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/signup",
            &format!("username={username}&nickname={username}&password={password}"),
            None,
        )
        .await
    }

    /// Sign up and log in, returning the `Cookie` header value.
    async fn login_as(&self, username: &str) -> String {
        self.signup(username, "Abcdef1!").await;
        let response = self
            .post_form(
                "/login",
                &format!("username={username}&password=Abcdef1!"),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie(&response)
    }

    async fn api_resorts(&self) -> Vec<Value> {
        let response = self.get("/api/resorts", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        serde_json::from_str::<Vec<Value>>(&body_text(response).await).unwrap()
    }
}

fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_owned()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Multipart body with text fields and an optional file field.
fn multipart(fields: &[(&str, &str)], picture: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = picture {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn resort_fields<'a>(name: &'a str, recommendation: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("country", "Portugal"),
        ("city", "Lagos"),
        ("resort_name", name),
        ("resort_type", "Beach"),
        ("recommendation", recommendation),
        ("expenditure", "300"),
        ("comment", "Great cliffs"),
    ]
}

#[tokio::test]
async fn health_reports_backend() {
    let app = test_app();
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn bundled_assets_are_served() {
    let app = test_app();

    let script = app.get("/assets/main.js", None).await;
    assert_eq!(script.status(), StatusCode::OK);
    assert_eq!(
        script.headers()[header::CONTENT_TYPE],
        "text/javascript; charset=utf-8"
    );
    assert!(body_text(script).await.contains("data-password-policy"));

    let style = app.get("/assets/style.css", None).await;
    assert_eq!(style.status(), StatusCode::OK);

    let signup = body_text(app.get("/signup", None).await).await;
    assert!(signup.contains(r#"href="/assets/style.css""#));
    assert!(signup.contains("data-password-policy="));
}

#[tokio::test]
async fn signup_validates_and_rejects_duplicates() {
    let app = test_app();

    let weak = app.signup("alice", "abc").await;
    assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
    let html = body_text(weak).await;
    assert!(html.contains("password must be at least 8 characters"));
    assert!(html.contains(r#"value="alice""#));

    let ok = app.signup("alice", "Abcdef1!").await;
    assert_eq!(ok.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&ok), "/login?notice=registered");

    let dup = app.signup("alice", "Abcdef1!").await;
    assert_eq!(dup.status(), StatusCode::CONFLICT);
    assert!(body_text(dup).await.contains("Username already exists"));

    let login = app.get("/login?notice=registered", None).await;
    assert!(body_text(login).await.contains("Registration successful"));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app();
    app.signup("alice", "Abcdef1!").await;

    let wrong = app
        .post_form("/login", "username=alice&password=Wrongpw1!", None)
        .await;
    let unknown = app
        .post_form("/login", "username=nobody&password=Abcdef1!", None)
        .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong.headers().get(header::SET_COOKIE).is_none());

    let wrong_html = body_text(wrong).await;
    let unknown_html = body_text(unknown).await;
    assert!(wrong_html.contains("Invalid username or password"));
    assert!(unknown_html.contains("Invalid username or password"));
}

#[tokio::test]
async fn session_cookie_grants_profile_until_logout() {
    let app = test_app();

    let anonymous = app.get("/profile", None).await;
    assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&anonymous), "/login?notice=login_required");

    let cookie = app.login_as("alice").await;
    assert!(cookie.starts_with("travelhub_session="));

    let profile = app.get("/profile", Some(&cookie)).await;
    assert_eq!(profile.status(), StatusCode::OK);
    assert!(body_text(profile).await.contains("Add a resort"));

    let logout = app.get("/logout", Some(&cookie)).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    let cleared = logout
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let after = app.get("/profile", Some(&cookie)).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn submission_with_executable_picture_drops_the_file() {
    let app = test_app();
    let cookie = app.login_as("alice").await;

    let body = multipart(&resort_fields("Praia", "9"), Some(("payload.exe", b"MZ\x90")));
    let response = app.post_multipart("/profile", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).to_owned();
    assert!(target.starts_with("/resort/"));

    let resorts = app.api_resorts().await;
    assert_eq!(resorts.len(), 1);
    assert_eq!(resorts[0]["resort_name"], "Praia");
    assert!(resorts[0]["picture"].is_null());
    assert!(!app.static_dir.path().join("uploads").exists());

    let detail = app.get(&target, None).await;
    assert_eq!(detail.status(), StatusCode::OK);
    assert!(body_text(detail).await.contains("Great cliffs"));
}

#[tokio::test]
async fn submission_with_image_is_served_from_static() {
    let app = test_app();
    let cookie = app.login_as("alice").await;

    let body = multipart(&resort_fields("Ponta", "7"), Some(("cliff.png", b"PNG-data")));
    let response = app.post_multipart("/profile", body, &cookie).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let resorts = app.api_resorts().await;
    let picture = resorts[0]["picture"].as_str().unwrap().to_owned();
    assert!(picture.starts_with("uploads/") && picture.ends_with("_cliff.png"));

    let served = app.get(&format!("/static/{picture}"), None).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_text(served).await, "PNG-data");
}

#[tokio::test]
async fn invalid_submission_rerenders_with_input() {
    let app = test_app();
    let cookie = app.login_as("alice").await;

    let mut fields = resort_fields("Ponta", "lots");
    fields.retain(|(name, _)| *name != "country");
    let response = app
        .post_multipart("/profile", multipart(&fields, None), &cookie)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let html = body_text(response).await;
    assert!(html.contains("country cannot be empty"));
    assert!(html.contains(r#"value="Ponta""#));
    assert!(app.api_resorts().await.is_empty());
}

#[tokio::test]
async fn ratings_average_and_unrated_resorts_sort_last() {
    let app = test_app();
    let alice = app.login_as("alice").await;
    let bob = app.login_as("bob").await;

    let response = app
        .post_multipart("/profile", multipart(&resort_fields("Unrated", ""), None), &alice)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .post_multipart("/profile", multipart(&resort_fields("Rated", "4"), None), &alice)
        .await;
    let rated = location(&response).to_owned();

    let review = app
        .post_form(&rated, "recommendation=6&expenditure=&comment=Nice", Some(&bob))
        .await;
    assert_eq!(review.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&review), rated);

    let resorts = app.api_resorts().await;
    assert_eq!(resorts.len(), 2);
    assert_eq!(resorts[0]["resort_name"], "Rated");
    assert_eq!(resorts[0]["avg_score"].as_f64(), Some(5.0));
    assert_eq!(resorts[1]["resort_name"], "Unrated");
    assert!(resorts[1]["avg_score"].is_null());

    let home = body_text(app.get("/", None).await).await;
    let rated_at = home.find("Rated<").unwrap();
    let unrated_at = home.find("Unrated<").unwrap();
    assert!(rated_at < unrated_at);
}

#[tokio::test]
async fn api_window_limits_results() {
    let app = test_app();
    let cookie = app.login_as("alice").await;
    for (name, score) in [("A", "1"), ("B", "2"), ("C", "3")] {
        app.post_multipart("/profile", multipart(&resort_fields(name, score), None), &cookie)
            .await;
    }

    let response = app.get("/api/resorts?offset=1&limit=1", None).await;
    let page: Vec<Value> = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["resort_name"], "B");
}

#[tokio::test]
async fn unknown_resort_is_404() {
    let app = test_app();
    let response = app.get("/resort/999", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn debug_users_requires_admin_and_hides_hashes() {
    let app = test_app();
    assert_eq!(
        app.get("/debug/users", None).await.status(),
        StatusCode::FORBIDDEN
    );

    let regular = app.login_as("alice").await;
    assert_eq!(
        app.get("/debug/users", Some(&regular)).await.status(),
        StatusCode::FORBIDDEN
    );

    app.state
        .accounts()
        .provision_admin("root", "Root", "Adm1n!pass")
        .await
        .unwrap();
    let response = app
        .post_form("/login", "username=root&password=Adm1n!pass", None)
        .await;
    let admin = session_cookie(&response);

    let response = app.get("/debug/users", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let text = body_text(response).await;
    assert!(!text.contains("password_hash"));
    assert!(!text.contains("$argon2"));
    let users: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(users.len(), 2);
}
