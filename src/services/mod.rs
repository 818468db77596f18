// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod google_oidc;
pub mod upload;

pub use google_oidc::{GoogleIdentity, GoogleOidcVerifier, OidcError};
pub use upload::{ResumeFile, ResumeStore};
