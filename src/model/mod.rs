//! Core data model types: message records and folder identity.

pub mod folder;
pub mod record;
