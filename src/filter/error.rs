use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Cast to {kind} failed for value \"{value}\" at path \"{field}\"")]
    InvalidValue {
        field: String,
        kind: &'static str,
        value: String,
    },
}
