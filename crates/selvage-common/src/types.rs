/// at:// URIs and their components
pub mod aturi;
/// Lexicon datetimes
pub mod datetime;
/// Decentralized identifiers
pub mod did;
/// Domain handles
pub mod handle;
/// IETF language tags
pub mod language;
/// Shared parse error and re-exports
pub mod string;
