//! Tipos compartilhados do Motriz.

pub mod config;
pub mod errors;
pub mod requests;
pub mod responses;
