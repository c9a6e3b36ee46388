//! HTTP platform adapter and per-platform profiles
//!
//! The adapter itself is platform-agnostic; each platform contributes a
//! [`PlatformProfile`] record in [`profiles`].

mod http;
mod oauth1;
pub mod profiles;

pub use http::{
    AuthScheme, BaseUrl, CredField, Endpoint, HttpMethod, HttpPlatform, Operation,
    PayloadEncoding, PlatformCredentials, PlatformProfile, ResponsePaths, UserLookup,
};
