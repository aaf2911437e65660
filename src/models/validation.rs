use thiserror::Error;

/// 客户端表单验证错误
///
/// 这一类错误在本地恢复，绝不发送到服务端。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Password must contain both letters and digits")]
    PasswordTooWeak,

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),
}

/// 密码最小长度
pub const MIN_PASSWORD_LEN: usize = 8;

/// 验证邮箱格式：非空、恰好一个 @、两侧非空且域名含点
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }

    let mut parts = email.split('@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    if local.is_empty() || domain.is_empty() || parts.next().is_some() {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }

    Ok(())
}

/// 验证密码强度：最小长度 + 字母和数字都出现
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::PasswordTooWeak);
    }
    Ok(())
}

/// 验证手机号：允许可选 + 前缀，其余为 7-15 位数字
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty()
        || digits.len() < 7
        || digits.len() > 15
        || !digits.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ValidationError::InvalidPhone(phone.to_string()));
    }
    Ok(())
}
