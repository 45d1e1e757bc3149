//! Test modules for TUIO client verification

pub mod helpers;
