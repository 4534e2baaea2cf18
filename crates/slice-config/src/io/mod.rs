//! File I/O for build config profiles.
//!
//! This module handles:
//! - The structured XML document holding scalar settings
//! - The sibling fragment directory holding the five G-code files

mod document;
mod fragments;

pub use document::{
    DocumentFields, ROOT_ELEMENT, encode_document, parse_document, read_document, write_document,
};
pub use fragments::{
    FragmentOutcome, FragmentReport, FragmentStatus, fragment_dir_for, read_fragment,
    write_fragment,
};
