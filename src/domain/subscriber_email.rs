use validator::ValidateEmail;

const MAX_LOCAL_PART_LENGTH: usize = 64;
const MAX_DOMAIN_LENGTH: usize = 64;
const MAX_EMAIL_LENGTH: usize = 254;

/// A trimmed, length-checked email address whose domain has been lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EmailValidationError {
    #[error("{0:?} is not a valid subscriber email.")]
    InvalidFormat(String),
    #[error("the local part of the email is {0} bytes long, the limit is 64.")]
    LocalPartTooLong(usize),
    #[error("the domain of the email is {0} bytes long, the limit is 64.")]
    DomainTooLong(usize),
    #[error("the email is {0} bytes long, the limit is 254.")]
    TooLong(usize),
}

impl SubscriberEmail {
    pub fn parse(s: String) -> Result<Self, EmailValidationError> {
        let trimmed = s.trim();
        if !trimmed.validate_email() {
            return Err(EmailValidationError::InvalidFormat(s));
        }

        let (local_part, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| EmailValidationError::InvalidFormat(s.clone()))?;
        if local_part.len() > MAX_LOCAL_PART_LENGTH {
            return Err(EmailValidationError::LocalPartTooLong(local_part.len()));
        }
        if domain.len() > MAX_DOMAIN_LENGTH {
            return Err(EmailValidationError::DomainTooLong(domain.len()));
        }

        let normalized = format!("{}@{}", local_part, domain.to_lowercase());
        if normalized.len() > MAX_EMAIL_LENGTH {
            return Err(EmailValidationError::TooLong(normalized.len()));
        }

        Ok(Self(strip_control_characters(&normalized)))
    }
}

/// Drops C0 controls, DEL and C1 controls.
pub fn strip_control_characters(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(*c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}'))
        .collect()
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
