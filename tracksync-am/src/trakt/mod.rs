//! Trakt API integration
//!
//! Covers the two calls the account manager needs: the OAuth token exchange
//! and the authenticated `users/settings` lookup.

pub mod client;
pub mod models;

pub use client::{TraktAppCredentials, TraktClient, TraktError};
pub use models::{TokenGrant, UserProfile, UserSettings};
