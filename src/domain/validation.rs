use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooShort {
        field: &'static str,
        min: usize,
        actual: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooShort { field, min, actual } => {
                write!(f, "{field} is too short: {actual} characters (min {min})")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
