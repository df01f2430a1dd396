//! Screens of the two sections and the dialogs drawn over them.
//!
//! `records` (plain table) and `dashboard` (cards and charts around the same
//! table) are interchangeable adapters over the one record view.

pub mod analytics;
pub mod dashboard;
pub mod dialogs;
pub mod records;
