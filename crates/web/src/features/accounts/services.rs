use chrono::{Duration, Utc};
use sqlx::PgPool;
use storage::{
    dto::{
        account::{
            AccessTokenResponse, ChangePasswordRequest, LoginRequest, LoginResponse,
            ProfileResponse, RefreshTokenRequest, RegisterRequest, RegisterResponse,
            ResetPasswordConfirmRequest, UpdateProfileRequest, VerifyPhoneRequest,
        },
        common::SuccessResponse,
    },
    models::{Account, NewAccount},
    repository::{
        account::{AccountRepository, AccountStore},
        verification::VerificationStore,
    },
    services::{
        image::{MAX_AVATAR_BYTES, decode_image},
        password::{hash_password, verify_password},
        verification_code::{generate_code, valid_since},
    },
};

use crate::auth::TokenService;
use crate::error::{WebError, WebResult};
use crate::media::MediaStorage;
use crate::sms::SmsSender;

const INVALID_CODE: &str = "Invalid or expired code";

fn hash(password: &str) -> WebResult<String> {
    hash_password(password).map_err(|e| WebError::InternalServerError(e.to_string()))
}

async fn store_avatar(media: &MediaStorage, payload: &str) -> WebResult<String> {
    let image = decode_image(payload, MAX_AVATAR_BYTES)
        .map_err(|e| WebError::field("avatar", e.to_string()))?;

    media
        .save_avatar(&image)
        .await
        .map_err(|e| WebError::InternalServerError(e.to_string()))
}

async fn discard_avatar(media: &MediaStorage, url: &str) {
    if let Err(e) = media.remove_avatar(url).await {
        tracing::warn!("Failed to remove unused avatar {}: {}", url, e);
    }
}

async fn issue_code(
    codes: &impl VerificationStore,
    phone_number: &str,
) -> WebResult<String> {
    let code = generate_code();
    codes.issue(phone_number, &code).await?;
    tracing::info!("Issued verification code for {}", phone_number);
    Ok(code)
}

/// Create an unverified account and text it a verification code.
///
/// A failed SMS delivery does not undo the registration; the user can ask
/// for a new code.
pub async fn register(
    accounts: &impl AccountStore,
    codes: &impl VerificationStore,
    sms: &dyn SmsSender,
    media: &MediaStorage,
    req: &RegisterRequest,
) -> WebResult<RegisterResponse> {
    if accounts.find_by_phone(&req.phone_number).await?.is_some() {
        return Err(WebError::field(
            "phone_number",
            "Phone number already registered",
        ));
    }

    if accounts.email_exists(&req.email).await? {
        return Err(WebError::field("email", "Email already registered"));
    }

    let password_hash = hash(&req.password)?;
    let avatar = store_avatar(media, &req.avatar).await?;

    let created = accounts
        .create(&NewAccount {
            phone_number: req.phone_number.clone(),
            email: Some(req.email.clone()),
            password_hash,
            first_name: Some(req.first_name.clone()),
            last_name: Some(req.last_name.clone()),
            avatar: Some(avatar.clone()),
            gender: req.gender.clone(),
            size: req.size.clone(),
            birthday: Some(req.birthday),
            country_id: req.country_id,
            sport_club_id: req.sport_club_id,
            ..Default::default()
        })
        .await;

    let account = match created {
        Ok(account) => account,
        Err(e) => {
            discard_avatar(media, &avatar).await;
            return Err(e.into());
        }
    };

    tracing::info!("Registered account {}", account.account_id);

    let code = issue_code(codes, &account.phone_number).await?;
    if let Err(e) = sms.send_code(&account.phone_number, &code).await {
        tracing::error!("Failed to deliver code to {}: {}", account.phone_number, e);
    }

    Ok(RegisterResponse {
        success: true,
        message: "Verification code sent".to_string(),
        account_id: account.account_id,
        phone_number: account.phone_number,
    })
}

pub async fn verify_phone(
    codes: &impl VerificationStore,
    req: &VerifyPhoneRequest,
    code_ttl: Duration,
) -> WebResult<SuccessResponse> {
    let since = valid_since(Utc::now().naive_utc(), code_ttl);

    if !codes.confirm_phone(&req.phone_number, &req.code, since).await? {
        tracing::warn!("Rejected verification code for {}", req.phone_number);
        return Err(WebError::Rejected(INVALID_CODE.to_string()));
    }

    tracing::info!("Verified phone number {}", req.phone_number);
    Ok(SuccessResponse::ok("Phone number verified"))
}

pub async fn resend_code(
    accounts: &impl AccountStore,
    codes: &impl VerificationStore,
    sms: &dyn SmsSender,
    phone_number: &str,
) -> WebResult<SuccessResponse> {
    let account = accounts
        .find_by_phone(phone_number)
        .await?
        .ok_or(WebError::NotFound)?;

    if account.is_verified {
        return Err(WebError::Rejected(
            "Phone number already verified".to_string(),
        ));
    }

    let code = issue_code(codes, phone_number).await?;
    sms.send_code(phone_number, &code)
        .await
        .map_err(|e| WebError::Upstream(e.to_string()))?;

    Ok(SuccessResponse::ok("Verification code sent"))
}

/// Exchange phone number and password for a token pair.
///
/// Unknown phone numbers and wrong passwords share one message.
pub async fn login(
    accounts: &impl AccountStore,
    tokens: &TokenService,
    req: &LoginRequest,
) -> WebResult<LoginResponse> {
    let account = accounts
        .find_by_phone(&req.phone_number)
        .await?
        .filter(|account| verify_password(&req.password, &account.password_hash));

    let Some(account) = account else {
        tracing::warn!("Failed login for {}", req.phone_number);
        return Err(WebError::AuthenticationFailed("User not found".to_string()));
    };

    if !account.is_verified {
        tracing::warn!("Login attempt by unverified account {}", account.account_id);
        return Err(WebError::AuthenticationFailed(
            "User is not verified".to_string(),
        ));
    }

    accounts.touch_login(account.account_id).await?;

    let tokens = tokens
        .issue_pair(&account)
        .map_err(|e| WebError::InternalServerError(e.to_string()))?;

    tracing::info!("Account {} logged in", account.account_id);

    Ok(LoginResponse {
        success: true,
        phone_number: account.phone_number,
        tokens,
    })
}

pub fn refresh_token(
    tokens: &TokenService,
    req: &RefreshTokenRequest,
) -> WebResult<AccessTokenResponse> {
    let access = tokens.refresh(&req.refresh).map_err(|e| {
        tracing::warn!("Rejected refresh token: {}", e);
        WebError::AuthenticationFailed("Token is invalid or expired".to_string())
    })?;

    Ok(AccessTokenResponse { access })
}

pub async fn change_password(
    accounts: &impl AccountStore,
    account: &Account,
    req: &ChangePasswordRequest,
) -> WebResult<SuccessResponse> {
    if !verify_password(&req.old_password, &account.password_hash) {
        tracing::warn!("Wrong old password for account {}", account.account_id);
        return Err(WebError::Rejected("Old password not match".to_string()));
    }

    accounts
        .update_password(account.account_id, &hash(&req.password)?)
        .await?;

    tracing::info!("Account {} changed its password", account.account_id);
    Ok(SuccessResponse::ok("Password updated successfully"))
}

pub async fn request_password_reset(
    accounts: &impl AccountStore,
    codes: &impl VerificationStore,
    sms: &dyn SmsSender,
    phone_number: &str,
) -> WebResult<SuccessResponse> {
    if accounts.find_by_phone(phone_number).await?.is_none() {
        return Err(WebError::NotFound);
    }

    let code = issue_code(codes, phone_number).await?;
    sms.send_code(phone_number, &code)
        .await
        .map_err(|e| WebError::Upstream(e.to_string()))?;

    Ok(SuccessResponse::ok("Verification code sent"))
}

pub async fn confirm_password_reset(
    codes: &impl VerificationStore,
    req: &ResetPasswordConfirmRequest,
    code_ttl: Duration,
) -> WebResult<SuccessResponse> {
    if !req.passwords_match() {
        return Err(WebError::Rejected("Passwords not match".to_string()));
    }

    let since = valid_since(Utc::now().naive_utc(), code_ttl);

    if !codes.check(&req.phone_number, &req.code, since).await? {
        tracing::warn!("Rejected reset code for {}", req.phone_number);
        return Err(WebError::Rejected(INVALID_CODE.to_string()));
    }

    let password_hash = hash(&req.password)?;

    if !codes
        .reset_password(&req.phone_number, &req.code, since, &password_hash)
        .await?
    {
        tracing::warn!("Rejected reset code for {}", req.phone_number);
        return Err(WebError::Rejected(INVALID_CODE.to_string()));
    }

    tracing::info!("Password reset for {}", req.phone_number);
    Ok(SuccessResponse::ok("Password reset successfully"))
}

pub async fn get_profile(pool: &PgPool, account_id: i32) -> WebResult<ProfileResponse> {
    Ok(AccountRepository::new(pool).profile(account_id).await?)
}

pub async fn update_profile(
    pool: &PgPool,
    media: &MediaStorage,
    account_id: i32,
    req: &UpdateProfileRequest,
) -> WebResult<ProfileResponse> {
    let avatar = match req.avatar.as_deref() {
        Some(payload) => Some(store_avatar(media, payload).await?),
        None => None,
    };

    let repo = AccountRepository::new(pool);
    if let Err(e) = repo.update_profile(account_id, req, avatar.as_deref()).await {
        if let Some(avatar) = &avatar {
            discard_avatar(media, avatar).await;
        }
        return Err(e.into());
    }

    Ok(repo.profile(account_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use base64::{Engine, engine::general_purpose::STANDARD};
    use chrono::{NaiveDate, NaiveDateTime};
    use storage::error::{Result as StorageResult, StorageError};
    use storage::services::verification_code::MAX_CODE_ATTEMPTS;

    use crate::sms::SmsError;

    struct PendingCode {
        code: String,
        created_at: NaiveDateTime,
        attempts: i32,
    }

    /// Accounts and pending codes kept in memory
    #[derive(Default)]
    struct MemoryStore {
        accounts: Mutex<Vec<Account>>,
        codes: Mutex<HashMap<String, PendingCode>>,
        /// Reject inserts the way the unique email constraint does
        email_taken: bool,
    }

    impl MemoryStore {
        fn account(&self, phone_number: &str) -> Account {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.phone_number == phone_number)
                .cloned()
                .unwrap()
        }

        fn age_code(&self, phone_number: &str, by: Duration) {
            let mut codes = self.codes.lock().unwrap();
            codes.get_mut(phone_number).unwrap().created_at -= by;
        }

        fn code_matches(&self, phone_number: &str, code: &str, since: NaiveDateTime) -> bool {
            let mut codes = self.codes.lock().unwrap();
            let Some(pending) = codes.get_mut(phone_number) else {
                return false;
            };

            let matches = pending.code == code
                && pending.created_at >= since
                && pending.attempts < MAX_CODE_ATTEMPTS;
            if !matches {
                pending.attempts += 1;
            }
            matches
        }

        fn take_code(&self, phone_number: &str, code: &str, since: NaiveDateTime) -> bool {
            if !self.code_matches(phone_number, code, since) {
                return false;
            }
            self.codes.lock().unwrap().remove(phone_number);
            true
        }
    }

    #[async_trait]
    impl AccountStore for MemoryStore {
        async fn find_by_id(&self, account_id: i32) -> StorageResult<Account> {
            self.accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.account_id == account_id)
                .cloned()
                .ok_or(StorageError::NotFound)
        }

        async fn find_by_phone(&self, phone_number: &str) -> StorageResult<Option<Account>> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .find(|a| a.phone_number == phone_number)
                .cloned())
        }

        async fn email_exists(&self, email: &str) -> StorageResult<bool> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .iter()
                .any(|a| a.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email))))
        }

        async fn create(&self, new: &NewAccount) -> StorageResult<Account> {
            if self.email_taken {
                return Err(StorageError::Duplicate {
                    field: "email",
                    message: "Email already registered".to_string(),
                });
            }

            let mut accounts = self.accounts.lock().unwrap();
            let now = Utc::now().naive_utc();
            let account = Account {
                account_id: accounts.len() as i32 + 1,
                phone_number: new.phone_number.clone(),
                email: new.email.clone(),
                password_hash: new.password_hash.clone(),
                first_name: new.first_name.clone(),
                last_name: new.last_name.clone(),
                avatar: new.avatar.clone(),
                gender: new.gender.clone().unwrap_or_else(|| "none".to_string()),
                size: new.size.clone().unwrap_or_else(|| "none".to_string()),
                birthday: new.birthday,
                height: None,
                weight: None,
                country_id: new.country_id,
                city_id: None,
                sport_club_id: new.sport_club_id,
                is_verified: new.is_verified,
                is_admin: new.is_admin,
                is_superuser: new.is_superuser,
                is_staff: new.is_staff,
                date_login: now,
                date_created: now,
            };
            accounts.push(account.clone());
            Ok(account)
        }

        async fn update_password(&self, account_id: i32, password_hash: &str) -> StorageResult<()> {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts
                .iter_mut()
                .find(|a| a.account_id == account_id)
                .ok_or(StorageError::NotFound)?;
            account.password_hash = password_hash.to_string();
            Ok(())
        }

        async fn touch_login(&self, _account_id: i32) -> StorageResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl VerificationStore for MemoryStore {
        async fn issue(&self, phone_number: &str, code: &str) -> StorageResult<()> {
            self.codes.lock().unwrap().insert(
                phone_number.to_string(),
                PendingCode {
                    code: code.to_string(),
                    created_at: Utc::now().naive_utc(),
                    attempts: 0,
                },
            );
            Ok(())
        }

        async fn check(
            &self,
            phone_number: &str,
            code: &str,
            valid_since: NaiveDateTime,
        ) -> StorageResult<bool> {
            Ok(self.code_matches(phone_number, code, valid_since))
        }

        async fn confirm_phone(
            &self,
            phone_number: &str,
            code: &str,
            valid_since: NaiveDateTime,
        ) -> StorageResult<bool> {
            if !self.take_code(phone_number, code, valid_since) {
                return Ok(false);
            }
            let mut accounts = self.accounts.lock().unwrap();
            match accounts.iter_mut().find(|a| a.phone_number == phone_number) {
                Some(account) => {
                    account.is_verified = true;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn reset_password(
            &self,
            phone_number: &str,
            code: &str,
            valid_since: NaiveDateTime,
            password_hash: &str,
        ) -> StorageResult<bool> {
            if !self.take_code(phone_number, code, valid_since) {
                return Ok(false);
            }
            let mut accounts = self.accounts.lock().unwrap();
            match accounts.iter_mut().find(|a| a.phone_number == phone_number) {
                Some(account) => {
                    account.password_hash = password_hash.to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    #[derive(Default)]
    struct RecordingSms {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSms {
        fn last_code(&self) -> String {
            self.sent.lock().unwrap().last().unwrap().1.clone()
        }
    }

    #[async_trait]
    impl SmsSender for RecordingSms {
        async fn send_code(&self, phone_number: &str, code: &str) -> Result<(), SmsError> {
            self.sent
                .lock()
                .unwrap()
                .push((phone_number.to_string(), code.to_string()));
            Ok(())
        }
    }

    const PHONE: &str = "+998901234567";

    fn ttl() -> Duration {
        Duration::seconds(300)
    }

    fn media() -> MediaStorage {
        MediaStorage::new(
            std::env::temp_dir().join(format!("accounts-test-{}", uuid::Uuid::new_v4())),
            "/media",
        )
    }

    fn tokens() -> TokenService {
        TokenService::new(b"test-secret", Duration::minutes(5), Duration::days(1))
    }

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            phone_number: PHONE.to_string(),
            password: "secret123".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john@example.com".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 6, 15).unwrap(),
            avatar: STANDARD.encode([0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            gender: None,
            size: None,
            country_id: None,
            sport_club_id: None,
        }
    }

    fn login_request(password: &str) -> LoginRequest {
        LoginRequest {
            phone_number: PHONE.to_string(),
            password: password.to_string(),
        }
    }

    async fn registered(store: &MemoryStore, sms: &RecordingSms) {
        register(store, store, sms, &media(), &register_request())
            .await
            .unwrap();
    }

    async fn verified(store: &MemoryStore, sms: &RecordingSms) {
        registered(store, sms).await;
        let req = VerifyPhoneRequest {
            phone_number: PHONE.to_string(),
            code: sms.last_code(),
        };
        verify_phone(store, &req, ttl()).await.unwrap();
    }

    #[tokio::test]
    async fn test_registration_creates_unverified_account() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;

        let account = store.account(PHONE);
        assert!(!account.is_verified);
        assert_ne!(account.password_hash, "secret123");
        assert!(account.avatar.unwrap().starts_with("/media/avatars/"));
        assert_eq!(sms.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_phone_is_a_field_error() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;

        let err = register(&store, &store, &sms, &media(), &register_request())
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::FieldErrors(fields) if fields.contains_key("phone_number")));
    }

    #[tokio::test]
    async fn test_matching_code_verifies_account() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;

        assert!(store.account(PHONE).is_verified);
    }

    #[tokio::test]
    async fn test_wrong_code_is_rejected() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;

        let code = if sms.last_code() == "000000" { "111111" } else { "000000" };
        let req = VerifyPhoneRequest {
            phone_number: PHONE.to_string(),
            code: code.to_string(),
        };

        let err = verify_phone(&store, &req, ttl()).await.unwrap_err();
        assert!(matches!(err, WebError::Rejected(_)));
        assert!(!store.account(PHONE).is_verified);
    }

    #[tokio::test]
    async fn test_code_stops_matching_after_too_many_guesses() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;

        let code = sms.last_code();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        for _ in 0..MAX_CODE_ATTEMPTS {
            let req = VerifyPhoneRequest {
                phone_number: PHONE.to_string(),
                code: wrong.to_string(),
            };
            assert!(verify_phone(&store, &req, ttl()).await.is_err());
        }

        let req = VerifyPhoneRequest {
            phone_number: PHONE.to_string(),
            code,
        };
        assert!(verify_phone(&store, &req, ttl()).await.is_err());
        assert!(!store.account(PHONE).is_verified);

        resend_code(&store, &store, &sms, PHONE).await.unwrap();
        let req = VerifyPhoneRequest {
            phone_number: PHONE.to_string(),
            code: sms.last_code(),
        };
        verify_phone(&store, &req, ttl()).await.unwrap();
        assert!(store.account(PHONE).is_verified);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_no_avatar_file() {
        let store = MemoryStore {
            email_taken: true,
            ..Default::default()
        };
        let sms = RecordingSms::default();
        let media = media();

        let err = register(&store, &store, &sms, &media, &register_request())
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::FieldErrors(fields) if fields.contains_key("email")));

        let mut entries = tokio::fs::read_dir(media.root().join("avatars")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        assert!(sms.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;
        store.age_code(PHONE, Duration::seconds(301));

        let req = VerifyPhoneRequest {
            phone_number: PHONE.to_string(),
            code: sms.last_code(),
        };

        assert!(verify_phone(&store, &req, ttl()).await.is_err());
        assert!(!store.account(PHONE).is_verified);
    }

    #[tokio::test]
    async fn test_unverified_account_cannot_login() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        registered(&store, &sms).await;

        for password in ["secret123", "wrong-password"] {
            let err = login(&store, &tokens(), &login_request(password))
                .await
                .unwrap_err();
            assert!(matches!(err, WebError::AuthenticationFailed(_)));
        }

        let err = login(&store, &tokens(), &login_request("secret123"))
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::AuthenticationFailed(msg) if msg == "User is not verified"));
    }

    #[tokio::test]
    async fn test_login_issues_tokens_for_verified_account() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;

        let response = login(&store, &tokens(), &login_request("secret123"))
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.phone_number, PHONE);

        let refreshed = refresh_token(
            &tokens(),
            &RefreshTokenRequest {
                refresh: response.tokens.refresh,
            },
        )
        .unwrap();
        assert!(!refreshed.access.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_password_reports_user_not_found() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;

        let err = login(&store, &tokens(), &login_request("wrong-password"))
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::AuthenticationFailed(msg) if msg == "User not found"));
    }

    #[tokio::test]
    async fn test_wrong_old_password_keeps_hash() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;
        let account = store.account(PHONE);

        let req = ChangePasswordRequest {
            old_password: "not-my-password".to_string(),
            password: "brand-new".to_string(),
        };

        let err = change_password(&store, &account, &req).await.unwrap_err();
        assert!(matches!(err, WebError::Rejected(msg) if msg == "Old password not match"));
        assert_eq!(store.account(PHONE).password_hash, account.password_hash);
    }

    #[tokio::test]
    async fn test_change_password_replaces_hash() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;
        let account = store.account(PHONE);

        let req = ChangePasswordRequest {
            old_password: "secret123".to_string(),
            password: "brand-new".to_string(),
        };

        change_password(&store, &account, &req).await.unwrap();
        assert!(login(&store, &tokens(), &login_request("brand-new")).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_requires_matching_code() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;
        let before = store.account(PHONE).password_hash;

        request_password_reset(&store, &store, &sms, PHONE)
            .await
            .unwrap();
        let code = sms.last_code();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        let mut req = ResetPasswordConfirmRequest {
            phone_number: PHONE.to_string(),
            code: wrong.to_string(),
            password: "newpass1".to_string(),
            password2: "newpass1".to_string(),
        };

        assert!(confirm_password_reset(&store, &req, ttl()).await.is_err());
        assert_eq!(store.account(PHONE).password_hash, before);

        req.code = code;
        confirm_password_reset(&store, &req, ttl()).await.unwrap();
        assert!(login(&store, &tokens(), &login_request("newpass1")).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_rejects_mismatched_passwords() {
        let store = MemoryStore::default();
        let req = ResetPasswordConfirmRequest {
            phone_number: PHONE.to_string(),
            code: "123456".to_string(),
            password: "newpass1".to_string(),
            password2: "newpass2".to_string(),
        };

        let err = confirm_password_reset(&store, &req, ttl()).await.unwrap_err();
        assert!(matches!(err, WebError::Rejected(msg) if msg == "Passwords not match"));
    }

    #[tokio::test]
    async fn test_reset_for_unknown_phone_is_not_found() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());

        let err = request_password_reset(&store, &store, &sms, PHONE)
            .await
            .unwrap_err();
        assert!(matches!(err, WebError::NotFound));
    }

    #[tokio::test]
    async fn test_resend_code_for_verified_account_is_rejected() {
        let (store, sms) = (MemoryStore::default(), RecordingSms::default());
        verified(&store, &sms).await;

        let err = resend_code(&store, &store, &sms, PHONE).await.unwrap_err();
        assert!(matches!(err, WebError::Rejected(_)));
    }
}
