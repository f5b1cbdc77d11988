use diesel::result::{DatabaseErrorKind, Error};
use rand::{distributions::Alphanumeric, Rng};

pub fn random_string(size: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}

/// True when a model call failed on a UNIQUE constraint, e.g. two sign-ups
/// racing for the same name.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<Error>(),
        Some(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
    )
}
