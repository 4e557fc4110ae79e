use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::claims::Identity;
use super::error::GateError;
use super::jwt::JwtKeys;

/// Header carrying the raw token.
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Validates a raw token header value and returns the embedded identity.
pub fn authenticate(keys: &JwtKeys, token: Option<&str>) -> Result<Identity, GateError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty());
    let Some(token) = token else {
        return Err(GateError::MissingToken);
    };
    match keys.verify(token) {
        Ok(claims) => Ok(claims.user),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            Err(GateError::InvalidToken)
        }
    }
}

/// Identity of the caller, extracted from `x-auth-token` or a bearer
/// `Authorization` header.
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = GateError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);

        if let Some(raw) = parts.headers.get(TOKEN_HEADER) {
            let token = raw.to_str().map_err(|_| GateError::InvalidToken)?;
            return authenticate(&keys, Some(token)).map(AuthUser);
        }

        match parts.headers.get(AUTHORIZATION) {
            None => Err(GateError::MissingToken),
            Some(raw) => {
                let value = raw.to_str().map_err(|_| GateError::InvalidToken)?;
                let token = value
                    .strip_prefix("Bearer ")
                    .or_else(|| value.strip_prefix("bearer "))
                    .ok_or(GateError::InvalidToken)?;
                authenticate(&keys, Some(token)).map(AuthUser)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::auth::jwt::tests::{make_keys, sample_user};

    async fn extract(keys: &JwtKeys, req: Request<()>) -> Result<Identity, GateError> {
        let (mut parts, _) = req.into_parts();
        AuthUser::from_request_parts(&mut parts, keys)
            .await
            .map(|AuthUser(id)| id)
    }

    #[test]
    fn missing_token_is_rejected() {
        let keys = make_keys("s", "i", "a");
        assert_eq!(authenticate(&keys, None), Err(GateError::MissingToken));
        assert_eq!(authenticate(&keys, Some("  ")), Err(GateError::MissingToken));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let keys = make_keys("s", "i", "a");
        let mut token = keys.sign(&sample_user()).unwrap();
        token.push('x');
        assert_eq!(authenticate(&keys, Some(&token)), Err(GateError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let keys = make_keys("s", "i", "a");
        let token = keys
            .sign_at(&sample_user(), OffsetDateTime::now_utc() - Duration::days(3))
            .unwrap();
        assert_eq!(authenticate(&keys, Some(&token)), Err(GateError::InvalidToken));
    }

    #[test]
    fn valid_token_yields_identity() {
        let keys = make_keys("s", "i", "a");
        let user = sample_user();
        let token = keys.sign(&user).unwrap();
        assert_eq!(authenticate(&keys, Some(&token)), Ok(Identity::from(&user)));
    }

    #[tokio::test]
    async fn extractor_reads_custom_header() {
        let keys = make_keys("s", "i", "a");
        let token = keys.sign(&sample_user()).unwrap();
        let req = Request::builder().header(TOKEN_HEADER, token).body(()).unwrap();
        let id = extract(&keys, req).await.expect("accepted");
        assert_eq!(id.username, "johndoe");
    }

    #[tokio::test]
    async fn extractor_reads_bearer_header() {
        let keys = make_keys("s", "i", "a");
        let token = keys.sign(&sample_user()).unwrap();
        let req = Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap();
        assert!(extract(&keys, req).await.is_ok());
    }

    #[tokio::test]
    async fn extractor_rejects_other_schemes_and_absence() {
        let keys = make_keys("s", "i", "a");
        let req = Request::builder()
            .header(AUTHORIZATION, "Basic am9objpwdw==")
            .body(())
            .unwrap();
        assert_eq!(extract(&keys, req).await.unwrap_err(), GateError::InvalidToken);

        let req = Request::builder().body(()).unwrap();
        assert_eq!(extract(&keys, req).await.unwrap_err(), GateError::MissingToken);
    }
}
