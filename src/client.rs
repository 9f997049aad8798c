//! NameSilo API client.
//!
//! Every operation is a thin formatter: build a query string, hand it to
//! the request pipeline, project fields out of the returned tree. The
//! pipeline is a strict sequence of gates — one HTTP GET, HTTP status
//! check, XML decode, status-code resolution — with no retries and no
//! caching. Caller-supplied parameter values are interpolated into the
//! query string as-is; only [`Contact`] fields carry the vendor's
//! space-to-`%20` pre-encoding.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::NameSiloError;
use crate::status;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{Contact, DomainInfo};
use crate::xml;

const API_URL: &str = "https://www.namesilo.com/api/";
const SANDBOX_API_URL: &str = "http://sandbox.namesilo.com/api/";

/// Client for the NameSilo registrar API.
///
/// Holds the access token and the sandbox/production choice made at
/// construction; both are fixed for the lifetime of the instance. The
/// client keeps no other state, so one instance may serve concurrent
/// callers as long as the injected transport does.
pub struct NameSiloClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
    sandbox: bool,
}

impl NameSiloClient {
    pub fn new(token: &str, sandbox: bool) -> Self {
        Self::with_transport(token, sandbox, Arc::new(ReqwestTransport::new()))
    }

    /// Build a client over a caller-supplied transport (custom timeouts,
    /// proxies, or a test double).
    pub fn with_transport(token: &str, sandbox: bool, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            token: token.to_string(),
            sandbox,
        }
    }

    fn base_url(&self) -> &'static str {
        if self.sandbox {
            SANDBOX_API_URL
        } else {
            API_URL
        }
    }

    /// Request pipeline shared by every operation: send, gate on HTTP
    /// status, decode, resolve the reply code, return the full tree.
    async fn process(&self, url_extend: &str) -> Result<Value, NameSiloError> {
        // The query string carries the API key; log the operation only.
        let operation = url_extend.split('?').next().unwrap_or(url_extend);
        let url = format!("{}{}", self.base_url(), url_extend);
        debug!(operation, "sending API request");

        let response = self.transport.get(&url).await?;
        if response.status != 200 {
            return Err(NameSiloError::Transport(response.status));
        }

        let tree = xml::decode(&response.body)?;
        let (code, detail) = xml::extract_code(&tree)?;
        let outcome = status::resolve(code, &detail)?;
        debug!(operation, code, outcome, "API reply accepted");
        Ok(tree)
    }

    /// Check whether a domain is available for registration. The presence
    /// of the `available` element is the marker; its content is ignored.
    pub async fn check_domain(&self, domain_name: &str) -> Result<bool, NameSiloError> {
        let url_extend = format!(
            "checkRegisterAvailability?version=1&type=xml&key={}&domains={}",
            self.token, domain_name
        );
        let reply = self.process(&url_extend).await?;
        Ok(reply["namesilo"]["reply"].get("available").is_some())
    }

    /// Fetch details for a domain in this account.
    pub async fn get_domain_info(&self, domain_name: &str) -> Result<DomainInfo, NameSiloError> {
        let url_extend = format!(
            "getDomainInfo?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        let reply = self.process(&url_extend).await?;
        DomainInfo::from_reply(&reply)
    }

    /// Replace both name servers for a domain.
    pub async fn change_domain_nameservers(
        &self,
        domain: &str,
        primary_ns: &str,
        secondary_ns: &str,
    ) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "changeNameServers?version=1&type=xml&key={}&domain={}&ns1={}&ns2={}",
            self.token, domain, primary_ns, secondary_ns
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// List every domain registered with this account.
    pub async fn list_domains(&self) -> Result<Vec<String>, NameSiloError> {
        let url_extend = format!("listDomains?version=1&type=xml&key={}", self.token);
        let reply = self.process(&url_extend).await?;
        let entries = xml::plural(&reply["namesilo"]["reply"]["domains"]["domain"])
            .ok_or_else(|| NameSiloError::MissingField("domains.domain".to_string()))?;
        entries
            .into_iter()
            .map(|entry| {
                entry
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| NameSiloError::MissingField("domains.domain".to_string()))
            })
            .collect()
    }

    /// Register a new domain. `auto_renew` and `private` are sent as the
    /// 0/1 flags the API expects.
    pub async fn register_domain(
        &self,
        domain_name: &str,
        years: u32,
        auto_renew: bool,
        private: bool,
    ) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "registerDomain?version=1&type=xml&key={}&domain={}&years={}&private={}&auto_renew={}",
            self.token,
            domain_name,
            years,
            u8::from(private),
            u8::from(auto_renew)
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// Renew a domain for the given number of years.
    pub async fn renew_domain(&self, domain_name: &str, years: u32) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "renewDomain?version=1&type=xml&key={}&domain={}&years={}",
            self.token, domain_name, years
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn lock_domain(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "domainLock?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn unlock_domain(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "domainUnlock?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn auto_renew_domain(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "addAutoRenewal?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn remove_auto_renew_domain(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "removeAutoRenewal?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn add_domain_privacy(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "addPrivacy?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    pub async fn remove_domain_privacy(&self, domain_name: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "removePrivacy?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// Current prices for every supported TLD, as the raw reply subtree.
    pub async fn get_prices(&self) -> Result<Value, NameSiloError> {
        let url_extend = format!("getPrices?version=1&type=xml&key={}", self.token);
        let reply = self.process(&url_extend).await?;
        Ok(reply["namesilo"]["reply"].clone())
    }

    /// List the account's contact profiles.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, NameSiloError> {
        let url_extend = format!("contactList?version=1&type=xml&key={}", self.token);
        let reply = self.process(&url_extend).await?;
        Contact::from_reply(&reply["namesilo"]["reply"]["contact"])
    }

    /// Add a contact profile to the account.
    pub async fn add_contact(&self, contact: &Contact) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "contactAdd?version=1&type=xml&key={}&fn={}&ln={}&ad={}&cy={}&st={}&zp={}&ct={}&em={}&ph={}",
            self.token,
            contact.first_name,
            contact.last_name,
            contact.address,
            contact.city,
            contact.state,
            contact.zip,
            contact.country,
            contact.email,
            contact.phone
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// Update an existing contact profile. The wire format joins first and
    /// last name into a single `fn` parameter separated by `%20`.
    pub async fn update_contact(&self, contact: &Contact) -> Result<(), NameSiloError> {
        let contact_id = contact
            .contact_id
            .as_deref()
            .ok_or_else(|| NameSiloError::MissingField("contact_id".to_string()))?;
        let url_extend = format!(
            "contactUpdate?version=1&type=xml&key={}&contact_id={}&fn={}%20{}&ad={}&cy={}&st={}&zp={}&ct={}&em={}&ph={}",
            self.token,
            contact_id,
            contact.first_name,
            contact.last_name,
            contact.address,
            contact.city,
            contact.state,
            contact.zip,
            contact.country,
            contact.email,
            contact.phone
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// Delete a contact profile by id.
    pub async fn delete_contact(&self, contact_id: &str) -> Result<(), NameSiloError> {
        let url_extend = format!(
            "contactDelete?version=1&type=xml&key={}&contact_id={}",
            self.token, contact_id
        );
        self.process(&url_extend).await?;
        Ok(())
    }

    /// Add funds from a stored payment profile; returns the new balance.
    pub async fn add_account_funds(
        &self,
        amount: f64,
        payment_id: u32,
    ) -> Result<f64, NameSiloError> {
        let url_extend = format!(
            "addAccountFunds?version=1&type=xml&key={}&amount={}&payment_id={}",
            self.token, amount, payment_id
        );
        let reply = self.process(&url_extend).await?;
        parse_amount(&reply["namesilo"]["reply"], "new_balance")
    }

    /// Current account balance. The API formats amounts with thousands
    /// separators; they are stripped before the numeric parse.
    pub async fn get_account_balance(&self) -> Result<f64, NameSiloError> {
        let url_extend = format!("getAccountBalance?version=1&type=xml&key={}", self.token);
        let reply = self.process(&url_extend).await?;
        parse_amount(&reply["namesilo"]["reply"], "balance")
    }

    /// List DNS resource records for a domain, as raw reply entries.
    pub async fn list_dns_records(&self, domain_name: &str) -> Result<Vec<Value>, NameSiloError> {
        let url_extend = format!(
            "dnsListRecords?version=1&type=xml&key={}&domain={}",
            self.token, domain_name
        );
        let reply = self.process(&url_extend).await?;
        let records = xml::plural(&reply["namesilo"]["reply"]["resource_record"])
            .ok_or_else(|| NameSiloError::MissingField("resource_record".to_string()))?;
        Ok(records.into_iter().cloned().collect())
    }

    /// Add a DNS resource record; returns the new record id.
    pub async fn add_dns_record(
        &self,
        domain_name: &str,
        record_type: &str,
        record_host: &str,
        record_value: &str,
        ttl: u32,
    ) -> Result<String, NameSiloError> {
        let url_extend = format!(
            "dnsAddRecord?version=1&type=xml&key={}&domain={}&rrtype={}&rrhost={}&rrvalue={}&rrttl={}",
            self.token, domain_name, record_type, record_host, record_value, ttl
        );
        let reply = self.process(&url_extend).await?;
        record_id(&reply)
    }

    /// Update an existing DNS resource record; returns the record id.
    pub async fn update_dns_record(
        &self,
        domain_name: &str,
        rrid: &str,
        record_host: &str,
        record_value: &str,
        ttl: u32,
    ) -> Result<String, NameSiloError> {
        let url_extend = format!(
            "dnsUpdateRecord?version=1&type=xml&key={}&domain={}&rrid={}&rrhost={}&rrvalue={}&rrttl={}",
            self.token, domain_name, rrid, record_host, record_value, ttl
        );
        let reply = self.process(&url_extend).await?;
        record_id(&reply)
    }
}

fn parse_amount(reply: &Value, key: &str) -> Result<f64, NameSiloError> {
    let raw = reply[key]
        .as_str()
        .ok_or_else(|| NameSiloError::MissingField(key.to_string()))?;
    raw.replace(',', "")
        .parse::<f64>()
        .map_err(|_| NameSiloError::MalformedReply(format!("{key} is not numeric: {raw}")))
}

fn record_id(reply: &Value) -> Result<String, NameSiloError> {
    reply["namesilo"]["reply"]["record_id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| NameSiloError::MissingField("record_id".to_string()))
}
