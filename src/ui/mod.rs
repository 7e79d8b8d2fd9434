//! Rendering layer: turns the cached `DashboardView` into egui widgets.

pub mod charts;
pub mod metrics;
pub mod panels;
pub mod table;
