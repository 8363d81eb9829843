use std::{
    fmt::{self, Display},
    str::FromStr,
};

use thiserror::Error;

/// A mailbox as presented in `MAIL FROM` or `RCPT TO`.
///
/// The null reverse-path (`<>`) is represented by an empty local part and
/// domain, see [`Mailbox::null`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mailbox {
    /// The local part (before @)
    pub local_part: String,
    /// The domain or address literal (after @)
    pub domain: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailboxError {
    #[error("Mailbox has unbalanced angle brackets: {0}")]
    UnbalancedBrackets(String),

    #[error("Mailbox is missing '@': {0}")]
    MissingAt(String),

    #[error("Mailbox has an empty local part: {0}")]
    EmptyLocalPart(String),

    #[error("Mailbox has an empty domain: {0}")]
    EmptyDomain(String),
}

impl Mailbox {
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }

    /// The null reverse-path, used for bounces.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.local_part.is_empty() && self.domain.is_empty()
    }
}

impl Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("<>")
        } else {
            write!(f, "{}@{}", self.local_part, self.domain)
        }
    }
}

impl FromStr for Mailbox {
    type Err = MailboxError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let inner = match trimmed.strip_prefix('<').map(|rest| rest.strip_suffix('>')) {
            Some(Some("")) => return Ok(Self::null()),
            Some(Some(inner)) => inner,
            None if !trimmed.ends_with('>') => trimmed,
            _ => return Err(MailboxError::UnbalancedBrackets(value.to_string())),
        };

        // Quoted local parts may legitimately contain '@', the domain never does.
        let (local_part, domain) = inner
            .rsplit_once('@')
            .ok_or_else(|| MailboxError::MissingAt(value.to_string()))?;

        if local_part.is_empty() {
            return Err(MailboxError::EmptyLocalPart(value.to_string()));
        }

        if domain.is_empty() {
            return Err(MailboxError::EmptyDomain(value.to_string()));
        }

        Ok(Self::new(local_part, domain))
    }
}
