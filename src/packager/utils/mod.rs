//! Collaborator utilities used across the pipeline: subprocess execution,
//! file operations, template rendering, XML normalization, downloads and
//! checksums.

pub mod checksum;
pub mod exec;
pub mod fs;
pub mod http;
pub mod render;
pub mod xml;
