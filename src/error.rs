//! Error types and handling for the weekend flight finder

use thiserror::Error;

/// Main error type for the weekend flight finder
#[derive(Error, Debug)]
pub enum WeekendFlightsError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Flight search or country lookup errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Mail composition or delivery errors
    #[error("Email error: {message}")]
    Email { message: String },
}

impl WeekendFlightsError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new email error
    pub fn email<S: Into<String>>(message: S) -> Self {
        Self::Email {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WeekendFlightsError::Config { .. } => {
                "Configuration error. Please check START_DATE, GMAIL_USER and GMAIL_PASSWORD."
                    .to_string()
            }
            WeekendFlightsError::Api { .. } => {
                "Unable to reach the flight search service. Please check your internet connection."
                    .to_string()
            }
            WeekendFlightsError::Email { .. } => {
                "Could not send the offers email. Please check the Gmail credentials.".to_string()
            }
        }
    }
}
