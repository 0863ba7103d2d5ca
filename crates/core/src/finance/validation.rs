use super::error::ValidationError;
use super::requests::{
    CreateAccountRequest, CreateCategoryRequest, CreateUserRequest, UpdateAccountRequest,
    UpdateCategoryRequest, UpdateUserRequest,
};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum accepted length for user, account and category names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Validates a display name: non-empty after trimming and bounded in length.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong {
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validates the `local@domain.tld` shape of an email address.
///
/// This is a shape check, not RFC 5322 parsing: exactly one `@`, no
/// whitespace, a non-empty local part and a domain with a dot that neither
/// starts nor ends the domain.
///
/// ```
/// use finbook_core::finance::validate_email;
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert!(validate_email("ana@example").is_err());
/// assert!(validate_email("ana @example.com").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !host.starts_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

/// Validates an ISO-4217 style code: exactly three uppercase ASCII letters.
pub fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidCurrencyCode(code.to_string()))
    }
}

pub fn validate_create_user(request: &CreateUserRequest) -> Result<(), ValidationError> {
    validate_name(&request.name)?;
    validate_email(&request.email)?;
    validate_password(&request.password)
}

pub fn validate_update_user(request: &UpdateUserRequest) -> Result<(), ValidationError> {
    if request.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(email) = &request.email {
        validate_email(email)?;
    }
    if let Some(password) = &request.password {
        validate_password(password)?;
    }
    Ok(())
}

pub fn validate_create_account(request: &CreateAccountRequest) -> Result<(), ValidationError> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(code) = &request.currency_code {
        validate_currency_code(code)?;
    }
    Ok(())
}

pub fn validate_update_account(request: &UpdateAccountRequest) -> Result<(), ValidationError> {
    if request.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(code) = &request.currency_code {
        validate_currency_code(code)?;
    }
    Ok(())
}

pub fn validate_create_category(request: &CreateCategoryRequest) -> Result<(), ValidationError> {
    validate_name(&request.name)
}

pub fn validate_update_category(request: &UpdateCategoryRequest) -> Result<(), ValidationError> {
    if request.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finance::types::CategoryKind;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ana").is_ok());
        assert_eq!(validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(
            validate_name(&"x".repeat(MAX_NAME_LENGTH + 1)),
            Err(ValidationError::NameTooLong {
                max: MAX_NAME_LENGTH
            })
        );
    }

    #[test]
    fn test_validate_email_accepts_common_shapes() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana.souza+bank@mail.example.com.br").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        for email in [
            "",
            "ana",
            "@example.com",
            "ana@",
            "ana@example",
            "ana@.com",
            "ana@example.",
            "ana@@example.com",
            "ana @example.com",
            "ana@exa mple.com",
        ] {
            assert!(validate_email(email).is_err(), "accepted {email:?}");
        }
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("123456").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("BRL").is_ok());
        assert!(validate_currency_code("brl").is_err());
        assert!(validate_currency_code("BR").is_err());
        assert!(validate_currency_code("BRLX").is_err());
        assert!(validate_currency_code("B1L").is_err());
    }

    #[test]
    fn test_validate_update_user_requires_a_field() {
        assert_eq!(
            validate_update_user(&UpdateUserRequest::default()),
            Err(ValidationError::NoFieldsToUpdate)
        );
        let request = UpdateUserRequest {
            password: Some("123".to_string()),
            ..Default::default()
        };
        assert_eq!(
            validate_update_user(&request),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn test_validate_create_account_allows_empty_body() {
        assert!(validate_create_account(&CreateAccountRequest::default()).is_ok());
        let request = CreateAccountRequest {
            currency_code: Some("usd".to_string()),
            ..Default::default()
        };
        assert!(validate_create_account(&request).is_err());
    }

    #[test]
    fn test_validate_category_requests() {
        let create = CreateCategoryRequest {
            name: " ".to_string(),
            kind: CategoryKind::Income,
            parent_id: None,
        };
        assert_eq!(
            validate_create_category(&create),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            validate_update_category(&UpdateCategoryRequest::default()),
            Err(ValidationError::NoFieldsToUpdate)
        );
    }
}
