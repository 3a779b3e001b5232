//! Pull zone hostname reconciler.
//!
//! Unique responsibility: add, update, read and remove a hostname of a
//! bunny.net pull zone, including its free TLS certificate and forced-SSL flag.
//!
//! API endpoints used (relative to the API base URL):
//! - POST `/pullzone/{id}/addHostname`
//! - DELETE `/pullzone/{id}/removeCertificate`
//! - GET `/pullzone/loadFreeCertificate?hostname={name}`
//! - POST `/pullzone/{id}/setForceSSL`
//! - DELETE `/pullzone/{id}/removeHostname`
//!
//! Steps are not transactional. When a step fails, the steps before it stay
//! applied on the remote side and the error is returned unchanged.

use reqwest::{Method, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

use crate::bunny_client::PullzoneApi;
use crate::bunny_error::BunnyError;
use crate::bunny_hostname_plan::{HostnameAction, plan_update};
use crate::bunny_pullzone::PullzoneHostname;

/// Reconciles pull zone hostnames against the bunny.net API.
pub struct HostnameReconciler<A> {
    api: A,
}

impl<A: PullzoneApi> HostnameReconciler<A> {
    /// Create a reconciler over the given API client.
    pub const fn new(api: A) -> Self {
        Self { api }
    }

    /// Get a reference to the underlying API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Add `desired.name` to its pull zone, then apply its certificate and
    /// forced-SSL settings.
    ///
    /// The add call returns no record, so the new hostname is located by name
    /// in the re-read zone before it is updated.
    ///
    /// # Errors
    ///
    /// Returns `PullzoneRequired` before any remote call if the zone id is
    /// zero, `HostnameNotFound` if the zone does not list the new name, or any
    /// error of `update`.
    pub async fn create(&self, desired: &PullzoneHostname) -> Result<PullzoneHostname, BunnyError> {
        let pullzone_id = desired.pullzone_id;
        if pullzone_id == 0 {
            return Err(BunnyError::PullzoneRequired);
        }

        let url = format!("{}/pullzone/{pullzone_id}/addHostname", self.api.api_url());
        let body = serde_json::to_vec(&HostnameRequest {
            Hostname: &desired.name,
        })?;
        self.expect_status(Method::POST, &url, Some(body), StatusCode::NO_CONTENT, "addHostname")
            .await?;
        info!(pullzone_id, hostname = %desired.name, "hostname added");

        let pullzone = self.api.get_pullzone(pullzone_id).await?;
        let created = pullzone
            .hostname_by_name(&desired.name)
            .ok_or(BunnyError::HostnameNotFound)?;

        // A fresh hostname has no forced SSL; only its certificate gates the plan.
        let before = PullzoneHostname {
            has_certificate: created.has_certificate,
            ..PullzoneHostname::default()
        };
        let target = PullzoneHostname {
            pullzone_id,
            has_certificate: desired.has_certificate,
            force_ssl: desired.force_ssl,
            ..created.clone()
        };

        self.update(&target, &before).await
    }

    /// Bring the remote hostname from `before` to `desired` and return the
    /// re-read state.
    ///
    /// # Errors
    ///
    /// Returns planning errors before any remote call, otherwise the first
    /// failing remote step.
    pub async fn update(
        &self,
        desired: &PullzoneHostname,
        before: &PullzoneHostname,
    ) -> Result<PullzoneHostname, BunnyError> {
        let actions = plan_update(desired, before)?;
        debug!(
            pullzone_id = desired.pullzone_id,
            hostname = %desired.name,
            ?actions,
            "hostname update planned"
        );

        for action in actions {
            self.apply(desired, action).await?;
        }

        self.get(desired.pullzone_id, desired.id).await
    }

    /// Read a hostname of a pull zone by its remote id.
    ///
    /// # Errors
    ///
    /// Returns `HostnameNotFound` if the zone does not list `id`, or the
    /// error of the zone read.
    pub async fn get(&self, pullzone_id: i64, id: i64) -> Result<PullzoneHostname, BunnyError> {
        let pullzone = self.api.get_pullzone(pullzone_id).await?;

        let mut hostname = pullzone
            .hostname_by_id(id)
            .cloned()
            .ok_or(BunnyError::HostnameNotFound)?;
        hostname.pullzone_id = pullzone_id;

        Ok(hostname)
    }

    /// Remove a hostname from a pull zone.
    ///
    /// # Errors
    ///
    /// Returns an `Api` error carrying the remote status unless the API
    /// answers `204 No Content`.
    pub async fn delete(&self, pullzone_id: i64, name: &str) -> Result<(), BunnyError> {
        let url = format!("{}/pullzone/{pullzone_id}/removeHostname", self.api.api_url());
        let body = serde_json::to_vec(&HostnameRequest { Hostname: name })?;

        self.expect_status(Method::DELETE, &url, Some(body), StatusCode::NO_CONTENT, "removeHostname")
            .await?;
        info!(pullzone_id, hostname = name, "hostname removed");

        Ok(())
    }

    /// Execute one planned action.
    async fn apply(&self, hostname: &PullzoneHostname, action: HostnameAction) -> Result<(), BunnyError> {
        let base = self.api.api_url();
        let pullzone_id = hostname.pullzone_id;
        debug!(pullzone_id, hostname = %hostname.name, %action, "applying hostname action");

        match action {
            HostnameAction::RemoveCertificate => {
                let url = format!("{base}/pullzone/{pullzone_id}/removeCertificate");
                let body = serde_json::to_vec(&HostnameRequest {
                    Hostname: &hostname.name,
                })?;
                self.expect_status(Method::DELETE, &url, Some(body), StatusCode::NO_CONTENT, action.operation())
                    .await
            }
            HostnameAction::LoadFreeCertificate => {
                let encoded: String =
                    url::form_urlencoded::byte_serialize(hostname.name.as_bytes()).collect();
                let url = format!("{base}/pullzone/loadFreeCertificate?hostname={encoded}");
                self.expect_status(Method::GET, &url, None, StatusCode::OK, action.operation())
                    .await
            }
            HostnameAction::SetForceSsl(force_ssl) => {
                let url = format!("{base}/pullzone/{pullzone_id}/setForceSSL");
                let body = serde_json::to_vec(&ForceSslRequest {
                    ForceSSL: force_ssl,
                    Hostname: &hostname.name,
                })?;
                self.expect_status(Method::POST, &url, Some(body), StatusCode::NO_CONTENT, action.operation())
                    .await
            }
        }
    }

    /// Perform a call and fail unless it answers exactly `expected`.
    async fn expect_status(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        expected: StatusCode,
        operation: &'static str,
    ) -> Result<(), BunnyError> {
        let resp = self.api.do_request(method, url, body).await?;

        if resp.status != expected {
            return Err(resp.into_error(operation));
        }

        Ok(())
    }
}

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Serialize)]
#[allow(non_snake_case)]
struct HostnameRequest<'a> {
    Hostname: &'a str,
}

#[derive(Debug, Serialize)]
#[allow(non_snake_case)]
struct ForceSslRequest<'a> {
    ForceSSL: bool,
    Hostname: &'a str,
}
