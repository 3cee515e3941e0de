//! Moderation warnings issued by administrators to users.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::validate_length;

pub const WARNING_MESSAGE_MIN_LEN: usize = 3;
pub const WARNING_MESSAGE_MAX_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningSeverity {
    Low,
    Medium,
    High,
}

impl WarningSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            _ => Err(CoreError::Validation(format!(
                "Invalid severity '{s}'. Must be one of: LOW, MEDIUM, HIGH"
            ))),
        }
    }
}

impl TryFrom<String> for WarningSeverity {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

pub fn validate_warning_message(message: &str) -> Result<(), CoreError> {
    validate_length(
        "message",
        message,
        WARNING_MESSAGE_MIN_LEN,
        WARNING_MESSAGE_MAX_LEN,
    )
}
