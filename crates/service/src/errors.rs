use std::fmt::Display;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    /// A foreign key on the written row points at nothing.
    #[error("missing parent: {0}")]
    MissingParent(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: impl Display) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::MissingParent(msg),
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Constraint(msg),
            _ => Self::Db(e.to_string()),
        }
    }
}
