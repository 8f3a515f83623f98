/// Store-level failures. Uniqueness and referential violations are typed
/// because the creation worker turns them into terminal job states; absence
/// of a row is modeled as `Option` on the individual port methods.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("dog named '{0}' already exists")]
    DuplicateName(String),
    #[error("email '{0}' is already registered")]
    DuplicateEmail(String),
    #[error("owner {0} does not exist")]
    UnknownOwner(i64),
}
