use storage::{
    dto::account::{validate_latin_name, validate_phone_number},
    models::{Account, NewAccount},
    repository::account::AccountStore,
    services::password::hash_password,
};

use crate::error::{AdminError, Result};

#[derive(Debug, Clone, Default)]
pub struct SuperuserInput {
    pub phone_number: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl SuperuserInput {
    fn validate(&self) -> Result<()> {
        validate_phone_number(&self.phone_number)
            .map_err(|_| AdminError::ValidationError("Invalid phone number".to_string()))?;

        if !(6..=64).contains(&self.password.chars().count()) {
            return Err(AdminError::ValidationError(
                "Password must be between 6 and 64 characters".to_string(),
            ));
        }

        for name in [&self.first_name, &self.last_name].into_iter().flatten() {
            validate_latin_name(name).map_err(|_| {
                AdminError::ValidationError(format!("{} is not a Latin name", name))
            })?;
        }

        Ok(())
    }
}

/// Create a verified staff account with every admin flag set
pub async fn create_superuser(accounts: &impl AccountStore, input: &SuperuserInput) -> Result<Account> {
    input.validate()?;

    if accounts.find_by_phone(&input.phone_number).await?.is_some() {
        return Err(AdminError::ValidationError(format!(
            "Account {} already exists",
            input.phone_number
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AdminError::ValidationError(e.to_string()))?;

    let account = accounts
        .create(&NewAccount {
            phone_number: input.phone_number.clone(),
            email: input.email.clone(),
            password_hash,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            is_verified: true,
            is_admin: true,
            is_superuser: true,
            is_staff: true,
            ..Default::default()
        })
        .await?;

    tracing::info!("Created superuser {}", account.account_id);

    Ok(account)
}
