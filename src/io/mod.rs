//! Import and export of the collaborator-facing file formats: person CSVs,
//! location/exclusion JSON, and the CSV exports of a solved roster.

pub mod csv_export;
pub mod csv_import;
pub mod json_import;
