//! Structural request checks run between decode and dispatch
//!
//! Every check runs; the failures are reported together as one composite status line.

use chrono::{DateTime, Utc};

use crate::protocol::{Request, StatusCode};

pub const RESOURCE_NAMESPACE: &str = "api/categories";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingMethod,
    MissingResource,
    MissingDate,
    IllegalDate,
}

impl Violation {
    pub fn reason(self) -> &'static str {
        match self {
            Self::MissingMethod => "missing method",
            Self::MissingResource => "missing resource",
            Self::MissingDate => "missing date",
            Self::IllegalDate => "illegal date",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    /// `4 BadRequest <reason>` once per violation, in check order.
    pub fn status_line(&self) -> String {
        self.violations
            .iter()
            .map(|violation| format!("{} {}", StatusCode::BadRequest.as_str(), violation.reason()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn validate(request: &Request) -> Result<(), ValidationFailure> {
    let mut violations = Vec::new();

    if request.method().is_empty() {
        violations.push(Violation::MissingMethod);
    }

    let echo_without_path = request.method() == "echo" && request.path().is_empty();
    if !echo_without_path && !request.path().contains(RESOURCE_NAMESPACE) {
        violations.push(Violation::MissingResource);
    }

    match request.date.as_deref() {
        None => violations.push(Violation::MissingDate),
        Some(date) if parse_unix_seconds(date).is_none() => {
            violations.push(Violation::IllegalDate)
        }
        Some(_) => {}
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { violations })
    }
}

fn parse_unix_seconds(value: &str) -> Option<DateTime<Utc>> {
    let seconds = value.trim().parse::<i64>().ok()?;
    DateTime::<Utc>::from_timestamp(seconds, 0)
}
