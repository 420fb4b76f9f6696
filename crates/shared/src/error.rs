use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("avatar color '{0}' is not in #RRGGBB form")]
    Malformed(String),
}
