//! HTTP implementations of the [`crate::services`] traits.

pub mod chicago;
pub mod cityhealth;
pub mod cta;
