use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::config::AppConfig;
use crate::models::ErrorResponse;
use crate::state::AppState;

/// Middleware guarding the /data routes. Rejects before any handler logic
/// runs, so failed requests never touch the store.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_basic)
        .map(|(username, password)| verify(&state.config, &username, &password))
        .unwrap_or(false);

    if !authorized {
        return unauthorized();
    }
    next.run(request).await
}

/// True iff both presented values exactly match the configured pair. Unset
/// configuration never authorizes.
pub fn verify(config: &AppConfig, username: &str, password: &str) -> bool {
    match (&config.api_username, &config.api_password) {
        (Some(expected_user), Some(expected_pass)) => {
            username == expected_user && password == expected_pass
        }
        _ => false,
    }
}

/// Splits an `Authorization: Basic` header value into its credential pair.
pub fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"tracker\"")],
        Json(ErrorResponse {
            error: "unauthorized".to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::{parse_basic, verify};
    use crate::config::AppConfig;

    fn config(username: Option<&str>, password: Option<&str>) -> AppConfig {
        AppConfig {
            api_username: username.map(str::to_string),
            api_password: password.map(str::to_string),
            database_url: "postgres://localhost/tracker".to_string(),
        }
    }

    #[test]
    fn matching_pair_is_accepted() {
        let config = config(Some("admin"), Some("secret"));
        assert!(verify(&config, "admin", "secret"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let config = config(Some("admin"), Some("secret"));
        assert!(!verify(&config, "admin", "wrong"));
        assert!(!verify(&config, "", ""));
    }

    #[test]
    fn unset_configuration_never_authorizes() {
        let config = config(None, None);
        assert!(!verify(&config, "", ""));
        let config = self::config(Some("admin"), None);
        assert!(!verify(&config, "admin", "secret"));
    }

    #[test]
    fn parses_basic_header() {
        // base64("admin:secret")
        let pair = parse_basic("Basic YWRtaW46c2VjcmV0").unwrap();
        assert_eq!(pair, ("admin".to_string(), "secret".to_string()));
    }

    #[test]
    fn password_may_contain_colons() {
        // base64("admin:se:cret")
        let pair = parse_basic("Basic YWRtaW46c2U6Y3JldA==").unwrap();
        assert_eq!(pair, ("admin".to_string(), "se:cret".to_string()));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(parse_basic("Bearer token").is_none());
        assert!(parse_basic("Basic !!!").is_none());
        // base64("no-separator")
        assert!(parse_basic("Basic bm8tc2VwYXJhdG9y").is_none());
    }
}
