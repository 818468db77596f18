// SPDX-License-Identifier: MIT

//! Database layer (Firestore, with an in-memory backend for tests).

pub mod firestore;

pub use firestore::Db;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const INTERVIEWS: &str = "interviews";
}
