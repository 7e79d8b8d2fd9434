//! Data layer: records, loading, filtering and aggregation.
//!
//! ```text
//! file ──loader──▶ AuditDataset ──filter(FilterSelection)──▶ Vec<&AuditRecord>
//!                                                              │
//!                      DashboardView ◀──view── aggregate ◀─────┘
//! ```
//!
//! The dataset is never mutated after loading. Every query borrows it
//! together with an explicit selection, so results depend only on inputs.

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod view;
