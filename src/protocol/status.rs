//! Closed status-code vocabulary of CJTP responses

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    Updated,
    BadRequest,
    NotFound,
    Error,
    IllegalMethod,
}

impl StatusCode {
    pub const ALL: [StatusCode; 7] = [
        StatusCode::Ok,
        StatusCode::Created,
        StatusCode::Updated,
        StatusCode::BadRequest,
        StatusCode::NotFound,
        StatusCode::Error,
        StatusCode::IllegalMethod,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "1 OK",
            Self::Created => "2 Created",
            Self::Updated => "3 Updated",
            Self::BadRequest => "4 BadRequest",
            Self::NotFound => "5 NotFound",
            Self::Error => "6 Error",
            Self::IllegalMethod => "7 IllegalMethod",
        }
    }

    /// Classifies a full status line such as `4 BadRequest missing date` by its
    /// leading literal.
    pub fn from_status_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| {
            line.strip_prefix(code.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        })
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
