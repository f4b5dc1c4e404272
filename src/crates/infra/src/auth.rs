use application::auth::{TokenService, UserClaims};
use application::error::AppError;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use serde::{Deserialize, Serialize};

pub trait AuthConfig {
    fn jwt_secret(&self) -> &str;
    fn jwt_expire_secs(&self) -> i64;
}

#[derive(Debug, Clone)]
pub struct JwtTokenService {
    jwt_secret: String,
    exp_secs: i64,
}

impl JwtTokenService {
    pub fn new(jwt_secret: &str, exp_secs: i64) -> Self {
        Self {
            jwt_secret: jwt_secret.to_string(),
            exp_secs,
        }
    }

    pub fn from_config(cfg: &impl AuthConfig) -> Self {
        Self::new(cfg.jwt_secret(), cfg.jwt_expire_secs())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwtClaims {
    pub sub: String,
    pub adm: bool,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    fn new(claims: &UserClaims, exp_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: claims.user_name.clone(),
            adm: claims.is_admin,
            exp: now + exp_secs,
            iat: now,
        }
    }
}

impl From<JwtClaims> for UserClaims {
    fn from(claims: JwtClaims) -> Self {
        Self {
            user_name: claims.sub,
            is_admin: claims.adm,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, claims: &UserClaims) -> Result<String, AppError> {
        let claims: JwtClaims = JwtClaims::new(claims, self.exp_secs);
        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let header = Header::new(Algorithm::HS256);
        let token =
            encode(&header, &claims, &key).map_err(|e| AppError::AuthError(e.to_string()))?;
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<UserClaims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::AuthError(e.to_string()))?;

        Ok(token_data.claims.into())
    }
}
