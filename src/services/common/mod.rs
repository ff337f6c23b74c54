//! Common utilities shared by services and the widget controller

/// Reactive property system for single-writer state publication
pub mod property;

pub use property::Property;
