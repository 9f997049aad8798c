//! Typed projections of NameSilo replies.
//!
//! Every struct here is built once from a decoded reply tree and owned by
//! the caller; nothing is cached or shared. Field values are kept exactly
//! as the vendor sends them (dates, Yes/No flags and the like stay
//! strings).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NameSiloError;

/// Domain details returned by `getDomainInfo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainInfo {
    pub auto_renew: String,
    pub created: String,
    pub expires: String,
    pub locked: String,
    pub private: String,
    pub status: String,
    pub traffic_type: String,
    pub name_servers: Vec<String>,
    pub contacts: ContactRoles,
}

impl DomainInfo {
    /// Project a successful `getDomainInfo` reply tree.
    pub fn from_reply(tree: &Value) -> Result<Self, NameSiloError> {
        let reply = &tree["namesilo"]["reply"];
        Ok(Self {
            auto_renew: text_field(reply, "auto_renew")?,
            created: text_field(reply, "created")?,
            expires: text_field(reply, "expires")?,
            locked: text_field(reply, "locked")?,
            private: text_field(reply, "private")?,
            status: text_field(reply, "status")?,
            traffic_type: text_field(reply, "traffic_type")?,
            name_servers: nameserver_list(&reply["nameservers"])?,
            contacts: ContactRoles::from_reply(&reply["contact_ids"])?,
        })
    }
}

/// The four contact-id references attached to a domain. These are ids into
/// the account's contact list, not owned contact records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRoles {
    pub administrative: String,
    pub billing: String,
    pub registrant: String,
    pub technical: String,
}

impl ContactRoles {
    pub fn from_reply(contact_ids: &Value) -> Result<Self, NameSiloError> {
        Ok(Self {
            administrative: text_field(contact_ids, "administrative")?,
            billing: text_field(contact_ids, "billing")?,
            registrant: text_field(contact_ids, "registrant")?,
            technical: text_field(contact_ids, "technical")?,
        })
    }
}

/// A NameSilo account contact.
///
/// Free-text fields are interpolated straight into query strings, so every
/// space is pre-encoded as `%20` at construction. Nothing else is escaped
/// (matching the vendor-observed wire format), and the transform runs
/// exactly once: re-encoding an already-encoded value is not a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub contact_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub zip: String,
}

impl Contact {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        contact_id: Option<&str>,
        first_name: &str,
        last_name: &str,
        address: &str,
        city: &str,
        state: &str,
        country: &str,
        email: &str,
        phone: &str,
        zip: &str,
    ) -> Self {
        Self {
            contact_id: contact_id.map(encode),
            first_name: encode(first_name),
            last_name: encode(last_name),
            address: encode(address),
            city: encode(city),
            state: encode(state),
            country: encode(country),
            email: encode(email),
            phone: encode(phone),
            zip: encode(zip),
        }
    }

    /// Normalize the `contact` reply field into a list of contacts.
    ///
    /// The vendor sends one contact as a single mapping and several as a
    /// sequence; the decode cannot tell those apart, so both shapes are
    /// accepted and the singular case yields a one-element list.
    pub fn from_reply(value: &Value) -> Result<Vec<Self>, NameSiloError> {
        match value {
            Value::Array(items) => items.iter().map(Self::from_entry).collect(),
            Value::Object(_) => Ok(vec![Self::from_entry(value)?]),
            _ => Err(NameSiloError::MissingField("contact".to_string())),
        }
    }

    fn from_entry(entry: &Value) -> Result<Self, NameSiloError> {
        Ok(Self {
            contact_id: entry["contact_id"].as_str().map(encode),
            first_name: encode(&text_field(entry, "first_name")?),
            last_name: encode(&text_field(entry, "last_name")?),
            address: encode(&text_field(entry, "address")?),
            city: encode(&text_field(entry, "city")?),
            state: encode(&text_field(entry, "state")?),
            country: encode(&text_field(entry, "country")?),
            email: encode(&text_field(entry, "email")?),
            phone: encode(&text_field(entry, "phone")?),
            zip: encode(&text_field(entry, "zip")?),
        })
    }
}

impl std::fmt::Display for Contact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} - {}",
            self.first_name,
            self.last_name,
            self.contact_id.as_deref().unwrap_or("-")
        )
    }
}

/// Spaces become `%20`; everything else passes through untouched.
fn encode(value: &str) -> String {
    value.replace(' ', "%20")
}

fn text_field(entry: &Value, key: &str) -> Result<String, NameSiloError> {
    entry[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| NameSiloError::MissingField(key.to_string()))
}

/// Normalize `nameservers.nameserver` (single mapping or sequence) into an
/// ordered list of host names, taken from each entry's `#text` leaf.
fn nameserver_list(nameservers: &Value) -> Result<Vec<String>, NameSiloError> {
    let entries = match &nameservers["nameserver"] {
        Value::Array(items) => items.iter().collect::<Vec<_>>(),
        Value::Null => {
            return Err(NameSiloError::MissingField(
                "nameservers.nameserver".to_string(),
            ))
        }
        single => vec![single],
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(map) => map
                .get("#text")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| NameSiloError::MissingField("nameserver.#text".to_string())),
            Value::String(host) => Ok(host.clone()),
            _ => Err(NameSiloError::MissingField("nameserver.#text".to_string())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml;
    use serde_json::json;

    const DOMAIN_INFO_REPLY: &[u8] = br#"<namesilo><reply>
        <code>300</code><detail>success</detail>
        <created>2018-05-21</created><expires>2019-05-21</expires>
        <status>Active</status><locked>Yes</locked><private>No</private>
        <auto_renew>No</auto_renew><traffic_type>Forwarded</traffic_type>
        <nameservers>
            <nameserver position="1">ns1.namesilo.com</nameserver>
            <nameserver position="2">ns2.namesilo.com</nameserver>
        </nameservers>
        <contact_ids>
            <registrant>450</registrant><administrative>450</administrative>
            <technical>451</technical><billing>450</billing>
        </contact_ids>
    </reply></namesilo>"#;

    #[test]
    fn contact_construction_encodes_spaces() {
        let contact = Contact::new(
            Some("10050"),
            "First",
            "Last",
            "Fake Address 18",
            "Some city",
            "Some state",
            "US",
            "some.email@some-provider.com",
            "00381695959559",
            "21000",
        );
        assert_eq!(contact.address, "Fake%20Address%2018");
        assert_eq!(contact.city, "Some%20city");
        assert_eq!(contact.first_name, "First");
        assert_eq!(contact.contact_id.as_deref(), Some("10050"));
    }

    #[test]
    fn contact_display_shows_name_and_id() {
        let contact = Contact::new(
            Some("10050"),
            "First",
            "Last",
            "a",
            "b",
            "c",
            "US",
            "e@f.com",
            "1",
            "2",
        );
        assert_eq!(contact.to_string(), "First Last - 10050");
    }

    #[test]
    fn single_contact_reply_yields_one_record() {
        let reply = json!({
            "contact_id": "500",
            "first_name": "First",
            "last_name": "Last",
            "address": "Fake Address 18",
            "city": "Zrenjanin",
            "state": "Vojvodina",
            "country": "RS",
            "email": "some.email@some.domain.com",
            "phone": "003816050005000",
            "zip": "23000"
        });
        let contacts = Contact::from_reply(&reply).expect("from_reply");
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].address, "Fake%20Address%2018");
        assert_eq!(contacts[0].contact_id.as_deref(), Some("500"));
    }

    #[test]
    fn contact_sequence_preserves_order() {
        let entry = |id: &str, first: &str| {
            json!({
                "contact_id": id,
                "first_name": first,
                "last_name": "Last",
                "address": "Street 1",
                "city": "City",
                "state": "State",
                "country": "US",
                "email": "a@b.com",
                "phone": "123",
                "zip": "10000"
            })
        };
        let reply = json!([entry("1", "Alpha"), entry("2", "Beta"), entry("3", "Gamma")]);
        let contacts = Contact::from_reply(&reply).expect("from_reply");
        assert_eq!(contacts.len(), 3);
        assert_eq!(contacts[0].first_name, "Alpha");
        assert_eq!(contacts[1].first_name, "Beta");
        assert_eq!(contacts[2].first_name, "Gamma");
    }

    #[test]
    fn contact_reply_with_missing_field_errors() {
        let reply = json!({"contact_id": "500", "first_name": "First"});
        assert!(matches!(
            Contact::from_reply(&reply),
            Err(NameSiloError::MissingField(_))
        ));
    }

    #[test]
    fn domain_info_projects_all_fields() {
        let tree = xml::decode(DOMAIN_INFO_REPLY).expect("decode");
        let info = DomainInfo::from_reply(&tree).expect("from_reply");
        assert_eq!(info.created, "2018-05-21");
        assert_eq!(info.expires, "2019-05-21");
        assert_eq!(info.status, "Active");
        assert_eq!(info.locked, "Yes");
        assert_eq!(info.private, "No");
        assert_eq!(info.auto_renew, "No");
        assert_eq!(info.traffic_type, "Forwarded");
        assert_eq!(
            info.name_servers,
            vec!["ns1.namesilo.com", "ns2.namesilo.com"]
        );
        assert_eq!(info.contacts.registrant, "450");
        assert_eq!(info.contacts.technical, "451");
    }

    #[test]
    fn domain_info_single_nameserver_normalizes_to_list() {
        let raw = br#"<namesilo><reply>
            <code>300</code><detail/>
            <created>2020-01-01</created><expires>2021-01-01</expires>
            <status>Active</status><locked>No</locked><private>No</private>
            <auto_renew>Yes</auto_renew><traffic_type>Custom</traffic_type>
            <nameservers><nameserver position="1">ns1.namesilo.com</nameserver></nameservers>
            <contact_ids>
                <registrant>1</registrant><administrative>1</administrative>
                <technical>1</technical><billing>1</billing>
            </contact_ids>
        </reply></namesilo>"#;
        let tree = xml::decode(raw).expect("decode");
        let info = DomainInfo::from_reply(&tree).expect("from_reply");
        assert_eq!(info.name_servers, vec!["ns1.namesilo.com"]);
    }

    #[test]
    fn domain_info_missing_field_errors() {
        let raw = b"<namesilo><reply><code>300</code><created>2020-01-01</created></reply></namesilo>";
        let tree = xml::decode(raw).expect("decode");
        assert!(matches!(
            DomainInfo::from_reply(&tree),
            Err(NameSiloError::MissingField(_))
        ));
    }
}
