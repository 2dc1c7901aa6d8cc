//! Synchronous IVOA TAP endpoint serving SQL results as VOTable, FITS, CSV,
//! TSV, plain text or HTML.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
