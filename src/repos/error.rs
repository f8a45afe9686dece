/**
 * Responsibility
 * - The meaning a repo passes upward (constraint violations vs. plain db failures)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("conflict")]
    Conflict,
    #[error("foreign key violation")]
    ForeignKey,
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            match dbe.code().as_deref() {
                Some("23505") => return RepoError::Conflict,
                Some("23503") => return RepoError::ForeignKey,
                _ => {}
            }
        }
        RepoError::Db(e)
    }
}
