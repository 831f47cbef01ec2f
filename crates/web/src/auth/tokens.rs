use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use storage::{dto::account::TokenPair, models::Account};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: String,
    pub phone_number: String,
    pub token_type: TokenType,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(account: &Account, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: account.account_id.to_string(),
            phone_number: account.phone_number.clone(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    pub fn account_id(&self) -> Result<i32, TokenError> {
        self.sub.parse().map_err(|_| TokenError::Invalid)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    #[error("Token is invalid")]
    Invalid,

    #[error("Expected a {expected:?} token")]
    WrongType { expected: TokenType },

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Issues and checks HS256 access/refresh tokens
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    pub fn issue_access(&self, account: &Account) -> Result<String, TokenError> {
        self.sign(&Claims::new(account, TokenType::Access, self.access_ttl))
    }

    pub fn issue_pair(&self, account: &Account) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            refresh: self.sign(&Claims::new(account, TokenType::Refresh, self.refresh_ttl))?,
            access: self.issue_access(account)?,
        })
    }

    /// Verify signature and expiry, then require the expected token kind
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })?;

        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }

        Ok(claims)
    }

    /// Mint a fresh access token from a refresh token's claims.
    ///
    /// The refresh token itself stays valid until it expires.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.decode(refresh_token, TokenType::Refresh)?;
        let now = Utc::now();

        self.sign(&Claims {
            sub: claims.sub,
            phone_number: claims.phone_number,
            token_type: TokenType::Access,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let now = Utc::now().naive_utc();
        Account {
            account_id: 42,
            phone_number: "+998901234567".to_string(),
            email: None,
            password_hash: String::new(),
            first_name: Some("John".to_string()),
            last_name: Some("Doe".to_string()),
            avatar: None,
            gender: "none".to_string(),
            size: "none".to_string(),
            birthday: None,
            height: None,
            weight: None,
            country_id: None,
            city_id: None,
            sport_club_id: None,
            is_verified: true,
            is_admin: false,
            is_superuser: false,
            is_staff: false,
            date_login: now,
            date_created: now,
        }
    }

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::minutes(5), Duration::days(1))
    }

    #[test]
    fn test_access_token_decodes_to_account() {
        let tokens = service().issue_pair(&account()).unwrap();
        let claims = service().decode(&tokens.access, TokenType::Access).unwrap();

        assert_eq!(claims.account_id().unwrap(), 42);
        assert_eq!(claims.phone_number, "+998901234567");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        let tokens = service().issue_pair(&account()).unwrap();

        assert!(matches!(
            service().decode(&tokens.refresh, TokenType::Access),
            Err(TokenError::WrongType { .. })
        ));
        assert!(matches!(
            service().refresh(&tokens.access),
            Err(TokenError::WrongType { .. })
        ));
    }

    #[test]
    fn test_refresh_issues_new_access_token() {
        let tokens = service().issue_pair(&account()).unwrap();
        let access = service().refresh(&tokens.refresh).unwrap();

        let claims = service().decode(&access, TokenType::Access).unwrap();
        assert_eq!(claims.account_id().unwrap(), 42);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let expired = TokenService::new(b"test-secret", Duration::minutes(-10), Duration::days(1));
        let token = expired.issue_access(&account()).unwrap();

        assert!(matches!(
            service().decode(&token, TokenType::Access),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let other = TokenService::new(b"other-secret", Duration::minutes(5), Duration::days(1));
        let token = other.issue_access(&account()).unwrap();

        assert!(matches!(
            service().decode(&token, TokenType::Access),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            service().decode("not-a-jwt", TokenType::Access),
            Err(TokenError::Invalid)
        ));
    }
}
