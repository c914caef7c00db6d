use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;

use crate::{constant::TEST_JWT_SECRET, error::TestError, TestSetup};

/// Global roles as encoded in the `role` claim
#[derive(Debug, Clone, Copy)]
pub enum TestRole {
    SuperAdmin,
    Admin,
    Manager,
    User,
    Viewer,
}

impl TestRole {
    fn claim(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::User => "USER",
            Self::Viewer => "VIEWER",
        }
    }
}

#[derive(Serialize)]
struct TestClaims<'a> {
    sub: i32,
    email: String,
    role: &'a str,
    societe_id: Option<i32>,
    exp: usize,
}

impl TestSetup {
    pub fn auth(&self) -> AuthFixtures {
        AuthFixtures
    }
}

pub struct AuthFixtures;

impl AuthFixtures {
    /// Signs a token valid for one hour with [`TEST_JWT_SECRET`].
    pub fn token(
        &self,
        user_id: i32,
        role: TestRole,
        societe_id: Option<i32>,
    ) -> Result<String, TestError> {
        let claims = TestClaims {
            sub: user_id,
            email: format!("user{}@topsteel.test", user_id),
            role: role.claim(),
            societe_id,
            exp: (Utc::now().timestamp() + 3600) as usize,
        };

        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )?)
    }

    /// `Bearer <token>` header value.
    pub fn bearer(
        &self,
        user_id: i32,
        role: TestRole,
        societe_id: Option<i32>,
    ) -> Result<String, TestError> {
        Ok(format!("Bearer {}", self.token(user_id, role, societe_id)?))
    }
}
