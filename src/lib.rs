//! Filter-and-aggregate engine behind the Big 4 risk & compliance dashboard.
//!
//! The desktop front-end lives in the `big4-dashboard` binary; everything it
//! shows is computed here from an immutable [`data::model::AuditDataset`] and a
//! [`data::filter::FilterSelection`].

pub mod data;
