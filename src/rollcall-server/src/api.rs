use actix_web::http::header::{self, ContentType};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use rollcall_core::config::Config;
use rollcall_core::models::{SearchRequest, HAS_MORE_HEADER, USERS_PATH};
use rollcall_core::search;
use rollcall_core::store::RecordSource;

use crate::error::ApiError;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn RecordSource>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordSource>, config: Arc<Config>) -> Self {
        Self { store, config }
    }
}

/// Search people
/// GET /users?limit=&offset=&query=&order_field=&order_by=
#[tracing::instrument(skip(params, state, http_req))]
pub async fn find_users(
    params: web::Query<HashMap<String, String>>,
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authorize(&http_req, &state.config)?;

    let request = SearchRequest::from_params(&params)?;
    let search_params = request.validate().map_err(|e| {
        tracing::debug!(reason = %e, "Rejected search request");
        e
    })?;

    let records = state.store.records().map_err(|e| {
        tracing::error!(error = %e, "Record store unreadable");
        e
    })?;

    let page = search::evaluate(records, &search_params);
    tracing::debug!(
        query_len = search_params.query.len(),
        offset = search_params.offset,
        limit = search_params.limit,
        returned = page.people.len(),
        has_more = page.has_more,
        "Search complete"
    );

    Ok(HttpResponse::Ok()
        .insert_header((HAS_MORE_HEADER, page.has_more.to_string()))
        .json(&page.people))
}

/// Anything but GET on the search resource
pub async fn method_not_allowed(http_req: HttpRequest) -> HttpResponse {
    tracing::debug!(method = %http_req.method(), "Method not allowed");
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "GET"))
        .content_type(ContentType::plaintext())
        .body("only GET method is allowed")
}

/// Health check
/// GET /health
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let records = state.store.records()?.len();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "records": records,
        "timestamp": Utc::now()
    })))
}

/// Check the bearer token against the configured set
fn authorize(http_req: &HttpRequest, config: &Config) -> Result<(), ApiError> {
    let token = http_req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingToken)?;

    if !config.accepts_token(token) {
        tracing::warn!("Rejected access token");
        return Err(ApiError::InvalidToken);
    }
    Ok(())
}

/// Configure routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(USERS_PATH)
            .route(web::get().to(find_users))
            .default_service(web::route().to(method_not_allowed)),
    )
    .route("/health", web::get().to(health));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use rollcall_core::models::Person;
    use rollcall_core::store::{RecordStore, StoreError};

    const FIXTURE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../rollcall-core/tests/fixtures/dataset.json"
    );
    const TOKEN: &str = "aboba";

    struct Unreadable;

    impl RecordSource for Unreadable {
        fn records(&self) -> Result<&[Person], StoreError> {
            Err(StoreError::Unavailable("dataset.json vanished".to_string()))
        }
    }

    fn state_with(store: Arc<dyn RecordSource>) -> web::Data<AppState> {
        let config = Config {
            access_tokens: vec![TOKEN.to_string()],
            ..Config::default()
        };
        web::Data::new(AppState::new(store, Arc::new(config)))
    }

    fn fixture_state() -> web::Data<AppState> {
        state_with(Arc::new(RecordStore::load(FIXTURE).unwrap()))
    }

    fn authed_get(query: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(&format!("{USERS_PATH}?{query}"))
            .insert_header((header::AUTHORIZATION, format!("Bearer {TOKEN}")))
    }

    fn has_more<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
        resp.headers()
            .get(HAS_MORE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    #[actix_web::test]
    async fn test_search_offset_sorted_by_age() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = authed_get("limit=3&offset=1&query=al&order_field=Age&order_by=1").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(has_more(&resp).as_deref(), Some("true"));

        let people: Vec<Person> = test::read_body_json(resp).await;
        let summary: Vec<(u64, &str, u32)> = people
            .iter()
            .map(|p| (p.id, p.name.as_str(), p.age))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "Hilda Mayer", 21),
                (2, "Brooks Aguilar", 25),
                (3, "Everett Dillard", 27)
            ]
        );
    }

    #[actix_web::test]
    async fn test_search_clamps_limit() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = authed_get("limit=27&offset=0&query=Hilda%20Mayer&order_field=Age&order_by=1").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(has_more(&resp).as_deref(), Some("false"));
        let people: Vec<Person> = test::read_body_json(resp).await;
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, 1);
    }

    #[actix_web::test]
    async fn test_limit_beyond_i64_is_clamped() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = authed_get("limit=99999999999999999999&query=Hilda").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(has_more(&resp).as_deref(), Some("false"));
        let people: Vec<Person> = test::read_body_json(resp).await;
        let ids: Vec<u64> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[actix_web::test]
    async fn test_offset_past_matches_is_empty() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = authed_get("limit=5&offset=40&query=al").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(has_more(&resp).as_deref(), Some("false"));
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"[]");
    }

    #[actix_web::test]
    async fn test_validation_errors_are_plain_text() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let cases = [
            ("limit=-3&offset=1&query=al&order_field=Age&order_by=1", "limit must be positive"),
            ("offset=0&query=al", "limit must be positive"),
            ("limit=3&offset=-1", "offset must be non-negative"),
            ("limit=3&order_by=5", "invalid order_by"),
            ("limit=3&offset=0&query=al&order_field=Lol&order_by=1", "invalid order_field"),
            ("limit=three", "limit must be an integer"),
            ("limit=-1&offset=abc", "limit must be positive"),
            ("limit=3&offset=abc", "offset must be an integer"),
        ];

        for (query, reason) in cases {
            let resp = test::call_service(&app, authed_get(query).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{query}");
            let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap();
            assert!(content_type.starts_with("text/plain"), "{content_type}");
            let body = test::read_body(resp).await;
            assert_eq!(std::str::from_utf8(&body).unwrap(), reason);
        }
    }

    #[actix_web::test]
    async fn test_rejects_other_methods() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/users?limit=3")
            .insert_header((header::AUTHORIZATION, format!("Bearer {TOKEN}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "GET");
    }

    #[actix_web::test]
    async fn test_missing_and_invalid_tokens() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/users?limit=3").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/users?limit=3")
            .insert_header((header::AUTHORIZATION, "Bearer nope"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"invalid access token");
    }

    #[actix_web::test]
    async fn test_auth_checked_before_validation() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/users?limit=-3").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_unreadable_store_is_opaque_server_error() {
        let app = test::init_service(
            App::new()
                .app_data(state_with(Arc::new(Unreadable)))
                .configure(configure),
        )
        .await;
        let resp = test::call_service(&app, authed_get("limit=3&query=al").to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"internal server error");
    }

    #[actix_web::test]
    async fn test_repeated_requests_are_byte_identical() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let query = "limit=4&offset=0&query=a&order_field=Name&order_by=-1";

        let first = test::read_body(test::call_service(&app, authed_get(query).to_request()).await).await;
        let second = test::read_body(test::call_service(&app, authed_get(query).to_request()).await).await;
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn test_health_reports_record_count() {
        let app = test::init_service(App::new().app_data(fixture_state()).configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["records"], 8);

        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok(), "{timestamp}");
    }
}
