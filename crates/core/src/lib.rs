#![forbid(unsafe_code)]

pub mod ids;
pub mod timestamp;

pub mod global_id {
    /// Random v4 UUID in the upper-case hyphenated form the application writes into `ZGID`.
    pub fn new_global_id() -> String {
        uuid::Uuid::new_v4().to_string().to_uppercase()
    }

    pub fn is_global_id(value: &str) -> bool {
        uuid::Uuid::try_parse(value).is_ok() && !value.chars().any(|c| c.is_ascii_lowercase())
    }
}
