//! NameSilo registrar API client.
//!
//! Method calls become signed HTTP GET queries against the NameSilo API
//! (sandbox or production). Every reply is an XML envelope carrying a
//! numeric status code; the client decodes the envelope into a generic
//! value tree, dispatches the code through a closed-world status table,
//! and projects the interesting replies into typed structs.
//!
//! Reference: https://www.namesilo.com/api-reference

pub mod client;
pub mod error;
pub mod status;
pub mod transport;
pub mod types;
pub mod xml;

pub use client::NameSiloClient;
pub use error::NameSiloError;
pub use status::ErrorKind;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{Contact, ContactRoles, DomainInfo};
