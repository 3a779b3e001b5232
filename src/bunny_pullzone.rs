//! bunny.net pull zone data model.
//!
//! Only the fields the hostname reconciler reads are modelled. Anything else
//! the API returns for a zone is ignored on decode.

use serde::{Deserialize, Serialize};

/// A pull zone as returned by `GET /pullzone/{id}`.
///
/// The zone is the only source of truth for its hostnames: it is re-read
/// after every mutation and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pullzone {
    /// Pull zone ID.
    #[serde(rename = "Id")]
    pub id: i64,
    /// Pull zone name.
    #[serde(rename = "Name", default)]
    pub name: String,
    /// Hostnames attached to the zone, in remote order.
    #[serde(rename = "Hostnames", default)]
    pub hostnames: Vec<PullzoneHostname>,
}

impl Pullzone {
    /// Find a hostname by its DNS name.
    #[must_use]
    pub fn hostname_by_name(&self, name: &str) -> Option<&PullzoneHostname> {
        self.hostnames.iter().find(|h| h.name == name)
    }

    /// Find a hostname by its remote id.
    #[must_use]
    pub fn hostname_by_id(&self, id: i64) -> Option<&PullzoneHostname> {
        self.hostnames.iter().find(|h| h.id == id)
    }
}

/// A hostname attached to a pull zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullzoneHostname {
    /// Remote id, zero until the hostname exists.
    #[serde(rename = "Id", default, skip_serializing_if = "is_zero")]
    pub id: i64,

    /// Owning pull zone id. Never serialized; stamped from context.
    #[serde(skip)]
    pub pullzone_id: i64,

    /// DNS name. Unique within the owning zone.
    #[serde(rename = "Value")]
    pub name: String,

    /// Whether this is the zone's default `*.b-cdn.net` hostname.
    #[serde(rename = "IsSystemHostname", default)]
    pub is_system_hostname: bool,

    /// Whether a TLS certificate is bound to the hostname.
    #[serde(rename = "HasCertificate", default)]
    pub has_certificate: bool,

    /// Whether plain HTTP is redirected to HTTPS.
    #[serde(rename = "ForceSSL", default)]
    pub force_ssl: bool,
}

impl PullzoneHostname {
    /// Desired state for a hostname that does not exist yet.
    #[must_use]
    pub fn new(pullzone_id: i64, name: impl Into<String>) -> Self {
        Self {
            pullzone_id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the desired certificate presence.
    #[must_use]
    pub const fn with_certificate(mut self, has_certificate: bool) -> Self {
        self.has_certificate = has_certificate;
        self
    }

    /// Set the desired forced-SSL flag.
    #[must_use]
    pub const fn with_force_ssl(mut self, force_ssl: bool) -> Self {
        self.force_ssl = force_ssl;
        self
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_zero(v: &i64) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::{Pullzone, PullzoneHostname};

    #[test]
    fn decodes_remote_field_names() {
        let raw = r#"{
            "Id": 5,
            "Name": "assets",
            "OriginUrl": "https://origin.example.com",
            "Hostnames": [
                {"Id": 11, "Value": "assets.b-cdn.net", "IsSystemHostname": true, "HasCertificate": true, "ForceSSL": false},
                {"Id": 12, "Value": "a.example.com", "IsSystemHostname": false, "HasCertificate": false, "ForceSSL": true}
            ]
        }"#;

        let zone: Pullzone = serde_json::from_str(raw).unwrap();
        assert_eq!(zone.id, 5);
        assert_eq!(zone.hostnames.len(), 2);
        assert!(zone.hostnames[0].is_system_hostname);
        assert_eq!(zone.hostname_by_name("a.example.com").map(|h| h.id), Some(12));
        assert_eq!(zone.hostname_by_id(11).map(|h| h.name.as_str()), Some("assets.b-cdn.net"));
        assert!(zone.hostname_by_id(99).is_none());
        // Context-only field is never part of the payload.
        assert_eq!(zone.hostnames[1].pullzone_id, 0);
    }

    #[test]
    fn omits_zero_id_and_zone_on_encode() {
        let hostname = PullzoneHostname::new(5, "a.example.com").with_force_ssl(true);
        let value = serde_json::to_value(&hostname).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "Value": "a.example.com",
                "IsSystemHostname": false,
                "HasCertificate": false,
                "ForceSSL": true
            })
        );
    }
}
