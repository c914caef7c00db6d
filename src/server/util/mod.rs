//! Utility functions shared by services.
//!
//! Reference/code generators for business documents and numeric helpers.

pub mod math;
pub mod reference;

#[cfg(test)]
pub mod test;
