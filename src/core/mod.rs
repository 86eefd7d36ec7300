//! Core building blocks: motion regressor validation, figure rendering,
//! registration request/backends, and the parameter structs that configure
//! them. These are consumed by the high-level `api` module.
pub mod motion;
pub mod params;
pub mod plot;
pub mod registration;
