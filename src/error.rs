use thiserror::Error;

use crate::status::ErrorKind;

/// Errors surfaced by the NameSilo client.
///
/// `Api` is the vendor telling us the operation failed; everything else is
/// a fault in the exchange itself. Errors propagate unchanged to the
/// original caller; nothing in this crate retries or recovers locally.
#[derive(Error, Debug, Clone)]
pub enum NameSiloError {
    /// The API endpoint answered with a non-200 HTTP status.
    #[error("API responded with status code: {0}")]
    Transport(u16),

    /// The HTTP exchange itself failed (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The reply body was not well-formed XML, or the envelope carried no
    /// numeric status code.
    #[error("Malformed API reply: {0}")]
    MalformedReply(String),

    /// The reply carried a status code missing from the status table. This
    /// is a library/vendor mismatch, not a business failure.
    #[error("Unknown API status code: {0}")]
    UnknownStatusCode(u32),

    /// A field the caller projects was absent from a successful reply.
    #[error("Missing field in API reply: {0}")]
    MissingField(String),

    /// A documented failure reported by the vendor. The message is either
    /// the vendor-supplied detail or the documented text for the code,
    /// depending on the code's family — never both.
    #[error("{message}")]
    Api {
        code: u32,
        kind: ErrorKind,
        message: String,
    },
}
