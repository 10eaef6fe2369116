use std::sync::Arc;

use auth::Authenticator;
use auth::TokenError;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use crate::account::errors::UserIdError;
use crate::domain::account::models::UserId;
use crate::inbound::http::handlers::ApiError;

/// Body message of every authentication rejection.
pub const UNAUTHORIZED_MESSAGE: &str = "Missing or invalid session token";

const BEARER_SCHEME: &str = "Bearer";

/// Identity resolved from a valid session token.
///
/// Inserted by [`authenticate`] and read by protected handlers as an
/// extractor; a handler taking this argument cannot run without it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or_else(|| ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
    }
}

/// Why a request was turned away. Only ever logged; the response is the same
/// for every variant.
#[derive(Debug, Error)]
pub enum AuthRejection {
    #[error("missing bearer token")]
    MissingToken,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("token subject is not a user id: {0}")]
    InvalidSubject(#[from] UserIdError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self, "Request rejected by authentication");
        ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()).into_response()
    }
}

/// Middleware that validates the bearer token and attaches the caller's
/// identity to the request.
///
/// On any failure the request is answered with 401 and the inner handler is
/// never called.
pub async fn authenticate(
    State(authenticator): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_bearer_token(req.headers())?;
    let subject = authenticator.validate_token(token)?;
    let user_id = UserId::from_string(&subject)?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthRejection::MalformedHeader)?;

    // Auth schemes are case-insensitive
    let (scheme, token) = auth_str
        .trim_start()
        .split_once(' ')
        .ok_or(AuthRejection::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(AuthRejection::MalformedHeader);
    }

    let token = token.trim();

    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use auth::WorkFactor;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::routing::get;
    use axum::Router;
    use chrono::Duration;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::with_work_factor(
                b"test_secret_key_at_least_32_bytes!",
                WorkFactor {
                    memory_kib: 1024,
                    iterations: 1,
                    parallelism: 1,
                },
            )
            .unwrap(),
        )
    }

    async fn whoami(caller: AuthenticatedUser) -> String {
        caller.user_id.to_string()
    }

    fn app(authenticator: Arc<Authenticator>) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(authenticator, authenticate))
    }

    async fn call(router: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = axum::http::Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = router
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let authenticator = authenticator();
        let token = authenticator.generate_token(42, Duration::hours(1)).unwrap();

        let (status, body) = call(app(authenticator), Some(&format!("Bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }

    #[tokio::test]
    async fn test_rejections_share_one_response() {
        let authenticator = authenticator();
        let expired = authenticator.generate_token(42, Duration::zero()).unwrap();
        let not_a_user = authenticator
            .generate_token("alice", Duration::hours(1))
            .unwrap();
        let foreign = Authenticator::new(b"another_secret_key_at_least_32_bytes")
            .generate_token(42, Duration::hours(1))
            .unwrap();

        let cases = vec![
            None,
            Some("Basic dXNlcjpwYXNz".to_string()),
            Some("Bearer ".to_string()),
            Some("Bearer not.a.token".to_string()),
            Some(format!("Bearer {}", expired)),
            Some(format!("Bearer {}", not_a_user)),
            Some(format!("Bearer {}", foreign)),
        ];

        let mut bodies = Vec::new();
        for case in cases {
            let (status, body) = call(app(Arc::clone(&authenticator)), case.as_deref()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "case {:?}", case);
            bodies.push(body);
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(bodies[0].contains(UNAUTHORIZED_MESSAGE));
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_is_unauthorized() {
        let router = Router::new().route("/whoami", get(whoami));

        let (status, _) = call(router, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthRejection::MissingToken)
        ));

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");

        headers.insert(header::AUTHORIZATION, "Token abc".parse().unwrap());
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthRejection::MalformedHeader)
        ));

        headers.insert(header::AUTHORIZATION, "Bearer".parse().unwrap());
        assert!(matches!(
            extract_bearer_token(&headers),
            Err(AuthRejection::MalformedHeader)
        ));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let mut headers = HeaderMap::new();

        for value in ["bearer abc.def.ghi", "BEARER abc.def.ghi", "bEaReR  abc.def.ghi"] {
            headers.insert(header::AUTHORIZATION, value.parse().unwrap());
            assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
        }
    }

    #[tokio::test]
    async fn test_lowercase_scheme_is_accepted() {
        let authenticator = authenticator();
        let token = authenticator.generate_token(42, Duration::hours(1)).unwrap();

        let (status, body) = call(app(authenticator), Some(&format!("bearer {}", token))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "42");
    }
}
