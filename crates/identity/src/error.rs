//! Identity error types

pub type IdentityResult<T> = Result<T, IdentityError>;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The configured signing secret is unusable. Surfaced at startup,
    /// never to webhook callers.
    #[error("webhook signing secret is not valid base64")]
    InvalidSecret,

    #[error("missing svix headers")]
    MissingHeaders,

    #[error("webhook signature verification failed")]
    SignatureInvalid,

    #[error("malformed webhook payload: {0}")]
    Payload(String),

    #[error("event carries no email address")]
    NoEmailAddress,

    #[error("user {0} is already provisioned")]
    AlreadyProvisioned(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
