//! # dnevnik-gate
//!
//! `dnevnik-gate` authenticates school-diary users against the ESIA identity
//! provider and gates diary data-fetch calls on the resulting session cookie.
//!
//! ## Login flow
//!
//! Authentication is a two-step, browser-driven exchange:
//!
//! 1. **Credential login** (`POST /login/login`): a headless browser fills the
//!    provider's login form. The cookies captured afterwards are persisted in
//!    a per-login jar entry with a short retention window.
//! 2. **SMS login** (`POST /login/sms_login`): a fresh browser replays the
//!    stored cookies, the out-of-band code is redeemed against the provider's
//!    OTP API, and the `sessionid` cookie extracted from the protected
//!    personal area becomes the caller's session artifact.
//!
//! ## Session gate
//!
//! Every `/dnevnik/*` endpoint is wrapped by a middleware stage that resolves
//! the `x-user-id` header to a stored session artifact and rejects the call
//! with `401` before the handler runs when none exists.
//!
//! All browser-driver calls are blocking and run on a bounded worker pool;
//! the async orchestration never touches the driver directly.

pub mod api;
pub mod auth;
pub mod cli;
pub mod dnevnik;
pub mod jar;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
