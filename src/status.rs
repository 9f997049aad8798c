//! NameSilo status-code table.
//!
//! The vendor overloads a single integer axis for request-shape,
//! authentication, billing, and domain-lifecycle errors. The whole mapping
//! lives in one static table so adding a vendor code is a one-line diff,
//! and resolution stays a pure function.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::NameSiloError;

/// Failure class for a documented status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or invalid request (101-108, 114).
    Transport,
    /// Key, user, or origin rejected (109-113, 116, 120).
    Auth,
    /// Payment profile or funds problems (117-119).
    Billing,
    /// Domain already in the requested state, or not this user's (200, 250-256).
    DomainState,
    /// Registration, renewal, or transfer failed (261-267).
    DomainLifecycle,
    /// Nameserver or resource-record modification failed (254, 280).
    Dns,
    /// Vendor-side failure (115, 201, 210).
    Internal,
    /// An identical request is still processing; resubmit later (400).
    ConcurrentRequest,
}

/// One row of the status table.
///
/// `DetailFailure` codes take their message from the reply's `detail`
/// field; the table text for those codes is documentation only.
#[derive(Debug, Clone, Copy)]
enum CodeEntry {
    Success(&'static str),
    Failure(ErrorKind, &'static str),
    DetailFailure(ErrorKind, &'static str),
}

use CodeEntry::{DetailFailure, Failure, Success};
use ErrorKind::{
    Auth, Billing, ConcurrentRequest, Dns, DomainLifecycle, DomainState, Internal, Transport,
};

static STATUS_CODES: LazyLock<HashMap<u32, CodeEntry>> = LazyLock::new(|| {
    HashMap::from([
        (101, Failure(Transport, "HTTPS not used")),
        (102, Failure(Transport, "No version specified")),
        (103, Failure(Transport, "Invalid API version")),
        (104, Failure(Transport, "No type specified")),
        (105, Failure(Transport, "Invalid API type")),
        (106, Failure(Transport, "No operation specified")),
        (107, Failure(Transport, "Invalid API operation")),
        (108, Failure(Transport, "Missing parameters for the specified operation")),
        (109, Failure(Auth, "No API key specified")),
        (110, Failure(Auth, "Invalid API key")),
        (111, Failure(Auth, "Invalid User")),
        (112, Failure(Auth, "API not available to Sub-Accounts")),
        (113, Failure(Auth, "This API account cannot be accessed from your IP")),
        (114, Failure(Transport, "Invalid Domain Syntax")),
        (115, Failure(Internal, "Central Registry Not Responding - try again later")),
        (116, Failure(Auth, "Invalid sandbox account")),
        (117, Failure(Billing, "The provided credit card profile either does not exist, or is not associated with your account")),
        (118, Failure(Billing, "The provided credit card profile has not been verified")),
        (119, Failure(Billing, "Insufficient account funds for requested transaction")),
        (120, Failure(Auth, "API key must be passed as a GET")),
        (200, Failure(DomainState, "Domain is not active, or does not belong to this user")),
        (201, Failure(Internal, "Internal system error")),
        (210, DetailFailure(Internal, "General error (details provided in response)")),
        (250, Failure(DomainState, "Domain is already set to AutoRenew - No update made.")),
        (251, Failure(DomainState, "Domain is already set not to AutoRenew - No update made.")),
        (252, Failure(DomainState, "Domain is already Locked - No update made.")),
        (253, Failure(DomainState, "Domain is already Unlocked - No update made.")),
        (254, Failure(Dns, "NameServer update cannot be made. (details provided in response)")),
        (255, Failure(DomainState, "Domain is already Private - No update made.")),
        (256, Failure(DomainState, "Domain is already Not Private - No update made.")),
        (261, DetailFailure(DomainLifecycle, "Domain processing error (details provided in response)")),
        (262, Failure(DomainLifecycle, "This domain is already active within our system and therefore cannot be processed.")),
        (263, Failure(DomainLifecycle, "Invalid number of years, or no years provided.")),
        (264, DetailFailure(DomainLifecycle, "Domain cannot be renewed for specified number of years (details provided in response)")),
        (265, DetailFailure(DomainLifecycle, "Domain cannot be transferred at this time (details provided in response)")),
        (266, Failure(DomainLifecycle, "No domain transfer exists for this user for this domain")),
        (267, Failure(DomainLifecycle, "Invalid domain name, or we do not support the provided extension/TLD.")),
        (280, Failure(Dns, "DNS modification error")),
        (300, Success("Successful API operation")),
        (301, Success("Successful registration, but not all provided hosts were valid resulting in our name servers being used")),
        (302, Success("Successful order, but there was an error with the contact information provided so your account default contact profile was used (you can configure your account to reject orders with invalid contact information via the Reseller Manager page in your account.)")),
        (400, DetailFailure(ConcurrentRequest, "Existing API request is still processing - request will need to be re-submitted")),
    ])
});

/// Dispatch a reply status code to its outcome.
///
/// Success codes return their documented message and ignore `detail`.
/// Failure codes return [`NameSiloError::Api`]; the message is `detail`
/// verbatim for detail-bearing codes (empty allowed), otherwise the table
/// text. A code absent from the table is a contract mismatch and fails
/// with [`NameSiloError::UnknownStatusCode`].
pub fn resolve(code: u32, detail: &str) -> Result<&'static str, NameSiloError> {
    match STATUS_CODES.get(&code) {
        Some(Success(message)) => Ok(message),
        Some(Failure(kind, message)) => Err(NameSiloError::Api {
            code,
            kind: *kind,
            message: (*message).to_string(),
        }),
        Some(DetailFailure(kind, _)) => Err(NameSiloError::Api {
            code,
            kind: *kind,
            message: detail.to_string(),
        }),
        None => Err(NameSiloError::UnknownStatusCode(code)),
    }
}
