//! Bunny Pullzone - bunny.net pull zone hostname library.
//!
//! A small library for managing the hostnames of a bunny.net pull zone:
//! - **Hostnames**: Add and remove hostnames on a pull zone
//! - **Certificates**: Provision free TLS certificates or unbind existing ones
//! - **Forced SSL**: Toggle HTTP to HTTPS redirection per hostname
//! - **Reconciliation**: Plan and apply the remote calls that bring a hostname to a desired state
//!
//! ## Quick Start
//!
//! All configuration is loaded from environment variables. Create a `.env` file:
//!
//! ```text
//! BUNNY_API_KEY=your_api_key_here
//! BUNNY_API_URL=https://api.bunny.net
//! ```
//!
//! Then use the reconciler to attach a hostname with a free certificate:
//!
//! ```ignore
//! use bunny_pullzone::{BunnyClient, BunnyClientConfig, HostnameReconciler, PullzoneHostname};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BunnyClient::new(BunnyClientConfig::from_env()?)?;
//!     let reconciler = HostnameReconciler::new(client);
//!
//!     let desired = PullzoneHostname::new(12345, "cdn.example.com")
//!         .with_certificate(true)
//!         .with_force_ssl(true);
//!     let hostname = reconciler.create(&desired).await?;
//!     println!("Hostname {} ready (id {})", hostname.name, hostname.id);
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy for strict discipline
#![deny(clippy::all)]                 // All standard Clippy lints
#![deny(clippy::pedantic)]            // Very strict Clippy lints
#![deny(clippy::nursery)]             // Experimental lints
#![deny(clippy::unwrap_used)]         // unwrap() is forbidden
#![deny(clippy::expect_used)]         // expect() is forbidden
#![deny(clippy::panic)]               // panic!() is forbidden
#![deny(clippy::print_stdout)]        // println!() is forbidden in production
#![deny(clippy::todo)]                // TODO is forbidden
#![deny(clippy::unimplemented)]       // unimplemented!() is forbidden
#![deny(clippy::missing_const_for_fn)] // Force const when possible
#![deny(clippy::unwrap_in_result)]    // unwrap() in Result is forbidden
#![deny(clippy::module_inception)]    // Module with same name as crate is forbidden
#![deny(clippy::redundant_clone)]     // Useless clones are forbidden
#![deny(clippy::shadow_unrelated)]    // Shadowing unrelated variables is forbidden
#![deny(clippy::too_many_arguments)]  // Limit function arguments
#![deny(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// Tests may unwrap
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

// ============================================================================
// Modules
// ============================================================================

/// Error type shared by all modules.
pub mod bunny_error;

/// bunny.net REST transport.
///
/// Use this module to configure the HTTP client and read pull zones.
pub mod bunny_client;

/// Pull zone and hostname data model.
pub mod bunny_pullzone;

/// Hostname update planning.
///
/// Use this module to compute the ordered remote calls of an update without executing them.
pub mod bunny_hostname_plan;

/// Hostname reconciliation.
///
/// Use this module to create, update, read and delete pull zone hostnames.
pub mod bunny_hostname;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use bunny_client::{ApiResponse, BunnyClient, BunnyClientConfig, PullzoneApi};
pub use bunny_error::BunnyError;
pub use bunny_hostname::HostnameReconciler;
pub use bunny_hostname_plan::{HostnameAction, plan_update};
pub use bunny_pullzone::{Pullzone, PullzoneHostname};
