/// File-level information command.
pub mod info;
/// JSON projection command.
pub mod json;
