/// Router Module Index
///
/// Organizes the application's routing logic into two modules split by access
/// level, so the gate each handler applies is visible from the module it lives
/// in rather than buried in the handler bodies.

/// Routes accessible to all visitors (read-only listings plus the login and
/// logout endpoints).
pub mod public;

/// Routes that mutate the catalog or render its forms. Every handler here
/// consults the admin session gate before touching the repository.
pub mod curation;
