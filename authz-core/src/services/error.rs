use thiserror::Error;

/// Engine errors.
///
/// Almost nothing here ever reaches a caller of `can`: principal and
/// resource lookup problems fold into deny decisions, and audit sink
/// failures are logged and swallowed. The exception is
/// `MalformedDescriptor`, which indicates a caller bug and is surfaced.
#[derive(Error, Debug)]
pub enum AuthzError {
    #[error("directory error: {0}")]
    Directory(anyhow::Error),

    #[error("malformed resource descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("audit sink unavailable: {0}")]
    AuditUnavailable(String),

    #[error("test mode activation denied: {0}")]
    ActivationDenied(String),

    #[error("configuration error: {0}")]
    Config(anyhow::Error),
}
