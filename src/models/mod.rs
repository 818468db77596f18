// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod interview;
pub mod user;

pub use interview::{Interview, Performance, Rating, Scenario, Status};
pub use user::{Credential, User, UserResponse, UserSummary};
