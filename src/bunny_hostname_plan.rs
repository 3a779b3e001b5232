//! Hostname update planning.
//!
//! Unique responsibility: compare a `before` snapshot of a hostname with its
//! desired state and produce the ordered list of remote calls that brings the
//! remote side in line.
//!
//! Non-goals:
//! - Call the bunny.net API (done by `bunny_hostname.rs`).
//! - Provision custom (non-free) certificates.
//!
//! The order of the returned actions is the execution order: certificate
//! changes are settled before the forced-SSL flag is written.

use std::fmt;

use crate::bunny_error::BunnyError;
use crate::bunny_pullzone::PullzoneHostname;

/// A single remote call in a hostname update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostnameAction {
    /// Unbind the current certificate.
    RemoveCertificate,
    /// Ask bunny.net to issue a free certificate.
    LoadFreeCertificate,
    /// Write the forced-SSL flag.
    SetForceSsl(bool),
}

impl HostnameAction {
    /// Remote operation name, as used in error messages.
    #[must_use]
    pub const fn operation(self) -> &'static str {
        match self {
            Self::RemoveCertificate => "removeCertificate",
            Self::LoadFreeCertificate => "loadFreeCertificate",
            Self::SetForceSsl(_) => "forceSSL",
        }
    }
}

impl fmt::Display for HostnameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetForceSsl(on) => write!(f, "{}({on})", self.operation()),
            _ => f.write_str(self.operation()),
        }
    }
}

/// Plan the remote calls needed to move a hostname from `before` to `desired`.
///
/// Only `before.has_certificate` is read from the snapshot. Everything else
/// comes from `desired`.
///
/// # Errors
///
/// - `PullzoneRequired` if `desired` has no owning zone.
/// - `SystemCertificateRemoval` if the plan would strip the certificate of a
///   system hostname.
pub fn plan_update(
    desired: &PullzoneHostname,
    before: &PullzoneHostname,
) -> Result<Vec<HostnameAction>, BunnyError> {
    if desired.pullzone_id == 0 {
        return Err(BunnyError::PullzoneRequired);
    }

    let removing = before.has_certificate && !desired.has_certificate;
    let adding = !before.has_certificate && desired.has_certificate;

    if desired.is_system_hostname && removing {
        return Err(BunnyError::SystemCertificateRemoval);
    }

    let mut actions = Vec::with_capacity(3);
    if !desired.is_system_hostname {
        if removing {
            actions.push(HostnameAction::RemoveCertificate);
        }
        if adding {
            actions.push(HostnameAction::LoadFreeCertificate);
        }
    }
    actions.push(HostnameAction::SetForceSsl(desired.force_ssl));

    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::{HostnameAction, plan_update};
    use crate::bunny_error::BunnyError;
    use crate::bunny_pullzone::PullzoneHostname;

    fn hostname(system: bool, cert: bool, force_ssl: bool) -> PullzoneHostname {
        PullzoneHostname {
            id: 7,
            pullzone_id: 5,
            name: "a.example.com".to_string(),
            is_system_hostname: system,
            has_certificate: cert,
            force_ssl,
        }
    }

    fn before(cert: bool) -> PullzoneHostname {
        PullzoneHostname {
            has_certificate: cert,
            ..PullzoneHostname::default()
        }
    }

    #[test]
    fn missing_zone_is_rejected() {
        let mut desired = hostname(false, true, true);
        desired.pullzone_id = 0;
        assert!(matches!(
            plan_update(&desired, &before(false)),
            Err(BunnyError::PullzoneRequired)
        ));
    }

    #[test]
    fn system_hostname_keeps_its_certificate() {
        let desired = hostname(true, false, false);
        assert!(matches!(
            plan_update(&desired, &before(true)),
            Err(BunnyError::SystemCertificateRemoval)
        ));
    }

    #[test]
    fn certificate_removal_precedes_force_ssl() {
        let actions = plan_update(&hostname(false, false, false), &before(true)).unwrap();
        assert_eq!(
            actions,
            vec![HostnameAction::RemoveCertificate, HostnameAction::SetForceSsl(false)]
        );
    }

    #[test]
    fn free_certificate_precedes_force_ssl() {
        let actions = plan_update(&hostname(false, true, true), &before(false)).unwrap();
        assert_eq!(
            actions,
            vec![HostnameAction::LoadFreeCertificate, HostnameAction::SetForceSsl(true)]
        );
    }

    #[test]
    fn unchanged_certificate_only_sets_force_ssl() {
        for cert in [false, true] {
            let actions = plan_update(&hostname(false, cert, true), &before(cert)).unwrap();
            assert_eq!(actions, vec![HostnameAction::SetForceSsl(true)]);
        }
    }

    #[test]
    fn system_hostname_never_touches_certificates() {
        // Adding is not attempted either; the service manages those itself.
        let actions = plan_update(&hostname(true, true, true), &before(false)).unwrap();
        assert_eq!(actions, vec![HostnameAction::SetForceSsl(true)]);
    }

    #[test]
    fn actions_render_operation_names() {
        assert_eq!(HostnameAction::LoadFreeCertificate.to_string(), "loadFreeCertificate");
        assert_eq!(HostnameAction::SetForceSsl(true).to_string(), "forceSSL(true)");
    }
}
