//! Document templates
//!
//! This module provides:
//! - The template model built from files or stored records
//! - Type-code normalization for word-processing templates
//! - Template file discovery and export

mod template;
mod files;
mod error;


pub use template::*;
pub use files::*;
pub use error::*;
