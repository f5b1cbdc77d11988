use std::fmt;

pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    TitleRequired,
    TitleTooLong,
    InvalidUrl,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::TitleRequired => "Title is required",
            ValidationError::TitleTooLong => "Title is too long",
            ValidationError::InvalidUrl => "Please enter a valid URL",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}
