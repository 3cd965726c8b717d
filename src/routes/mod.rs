//! Router Module Index
//!
//! Routes are grouped by the guard their handlers require. The guard itself is
//! not a layer: it is the `Claims` / `AdminClaims` argument in each handler
//! signature, so a handler cannot be mounted without its check.

/// Routes accessible to anonymous clients (landing, health, login).
pub mod public;

/// Routes whose handlers take `Claims` (any valid token).
pub mod authenticated;

/// Routes whose handlers take `AdminClaims` (valid token with the admin flag).
pub mod admin;
