// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErpError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response envelope: {0}")]
    Envelope(String),

    #[error("Could not decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },
}

impl ErpError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ErpError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        ErpError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

pub type ErpResult<T> = Result<T, ErpError>;
