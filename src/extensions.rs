use core::fmt::{self, Display};

use crate::options::SmtpServerOptions;

/// SMTP service extensions advertised in the EHLO response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    /// 8BITMIME (RFC 6152)
    EightBitMime,

    /// PIPELINING (RFC 2920)
    Pipelining,

    /// STARTTLS (RFC 3207), only offered while the session is still plain.
    Starttls,

    /// SIZE (RFC 1870). A value of 0 is advertised as a bare `SIZE`.
    Size(usize),

    /// AUTH (RFC 4954) with the PLAIN and LOGIN mechanisms.
    Auth,
}

impl Display for Extension {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::EightBitMime => fmt.write_str("8BITMIME"),
            Self::Pipelining => fmt.write_str("PIPELINING"),
            Self::Starttls => fmt.write_str("STARTTLS"),
            Self::Size(max) => {
                if *max == 0 {
                    fmt.write_str("SIZE")
                } else {
                    write!(fmt, "SIZE {max}")
                }
            }
            Self::Auth => fmt.write_str("AUTH PLAIN LOGIN"),
        }
    }
}

/// The extensions a session should advertise, given the server options and
/// whether the session is already running over TLS.
pub fn advertised(options: &dyn SmtpServerOptions, secure: bool) -> Vec<Extension> {
    let mut extensions = vec![Extension::EightBitMime, Extension::Pipelining];

    if options.supports_tls() && !secure {
        extensions.push(Extension::Starttls);
    }

    extensions.push(Extension::Size(options.max_message_size()));

    if options.supports_authentication() && (secure || options.allow_unsecure_authentication()) {
        extensions.push(Extension::Auth);
    }

    extensions
}
