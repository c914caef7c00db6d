use axum::{extract::FromRequestParts, http::header, http::request::Parts, http::HeaderMap};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::server::{
    error::{auth::AuthError, Error},
    model::app::AppState,
};

/// Role granted by the auth service across every societe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GlobalRole {
    SuperAdmin,
    Admin,
    Manager,
    Commercial,
    Comptable,
    Technicien,
    Operateur,
    User,
    Viewer,
}

impl GlobalRole {
    pub fn is_admin(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Commercial => "COMMERCIAL",
            Self::Comptable => "COMPTABLE",
            Self::Technicien => "TECHNICIEN",
            Self::Operateur => "OPERATEUR",
            Self::User => "USER",
            Self::Viewer => "VIEWER",
        }
    }
}

/// JWT claims issued by the auth service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub email: String,
    pub role: GlobalRole,
    #[serde(default)]
    pub societe_id: Option<i32>,
    pub exp: usize,
}

/// Verifies HS256 bearer tokens
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;

        Ok(data.claims)
    }
}

/// Authenticated caller, extracted from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
    pub role: GlobalRole,
    pub societe_id: Option<i32>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
            societe_id: claims.societe_id,
        }
    }
}

impl AuthUser {
    /// Returns `AuthError::InsufficientRole` unless the caller is `ADMIN` or `SUPER_ADMIN`.
    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AuthError::InsufficientRole {
                role: self.role.as_str().to_string(),
            })
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let claims = state.jwt.decode(token)?;

        Ok(claims.into())
    }
}

/// Extracts the token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue};
    use jsonwebtoken::{EncodingKey, Header};

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn token(role: GlobalRole, exp: usize) -> String {
        let claims = Claims {
            sub: 3,
            email: "chef@atelier.fr".to_string(),
            role,
            societe_id: Some(1),
            exp,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    /// Expect a valid token to decode into its claims
    #[test]
    fn decodes_valid_token() {
        let keys = JwtKeys::new(SECRET);

        let claims = keys.decode(&token(GlobalRole::Manager, far_future())).unwrap();

        assert_eq!(claims.sub, 3);
        assert_eq!(claims.role, GlobalRole::Manager);
        assert_eq!(claims.societe_id, Some(1));
    }

    /// Expect InvalidToken for an expired token
    #[test]
    fn rejects_expired_token() {
        let keys = JwtKeys::new(SECRET);

        let result = keys.decode(&token(GlobalRole::Admin, 1000));

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    /// Expect InvalidToken when signed with another secret
    #[test]
    fn rejects_foreign_signature() {
        let keys = JwtKeys::new("another-secret-another-secret-0000");

        let result = keys.decode(&token(GlobalRole::Admin, far_future()));

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn parses_bearer_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    /// Expect only ADMIN and SUPER_ADMIN to pass the admin check
    #[test]
    fn require_admin_checks_role() {
        let mut user = AuthUser {
            id: 1,
            email: "a@b.fr".to_string(),
            role: GlobalRole::SuperAdmin,
            societe_id: None,
        };
        assert!(user.require_admin().is_ok());

        user.role = GlobalRole::Manager;
        assert!(matches!(
            user.require_admin(),
            Err(AuthError::InsufficientRole { role }) if role == "MANAGER"
        ));
    }
}
