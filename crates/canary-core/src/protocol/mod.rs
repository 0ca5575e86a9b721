//! Wire formats for the Cloud Monitoring v3 REST API.
//!
//! Only the subset needed to write custom metric points is modelled.
//! Field names follow the API's JSON (camelCase).

pub mod timeseries;
