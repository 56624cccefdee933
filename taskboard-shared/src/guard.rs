/// Request guard pipeline
///
/// Guards are evaluated in order before a command runs; the first denial
/// aborts the request and the command never executes. Each guard is a pure
/// predicate over the caller identity, returning either "proceed" or a
/// structured [`Denial`] the API layer maps to a redirect-with-message.
///
/// # Pipeline order
///
/// 1. Authentication: the caller must be logged in.
/// 2. Ownership: User records may only be changed by that same user.
/// 3. Authorship: a task may only be deleted by its author.
///
/// # Example
///
/// ```
/// use taskboard_shared::guard::{require_authenticated, require_self, run, Denial};
///
/// // Caller 1 updating user 1: both guards pass
/// let caller = require_authenticated(Some(1)).unwrap();
/// assert!(run([require_self(caller, 1)]).is_ok());
///
/// // Caller 1 updating user 2: denied
/// assert_eq!(run([require_self(caller, 2)]), Err(Denial::NotOwner));
/// ```

use serde::Serialize;

/// Structured denial reason produced by a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum Denial {
    /// No valid caller identity was presented
    #[error("You are not logged in! Please log in.")]
    NotAuthenticated,

    /// The caller tried to change another user's record
    #[error("You have no rights to change another user.")]
    NotOwner,

    /// The caller tried to delete a task they did not author
    #[error("The task can be deleted only by its author.")]
    NotAuthor,
}

/// Result of one guard predicate
pub type GuardResult = Result<(), Denial>;

/// Requires a logged-in caller, yielding their user ID
pub fn require_authenticated(caller: Option<i64>) -> Result<i64, Denial> {
    caller.ok_or(Denial::NotAuthenticated)
}

/// Requires that the caller is acting on their own User record
pub fn require_self(caller: i64, target_user: i64) -> GuardResult {
    if caller == target_user {
        Ok(())
    } else {
        Err(Denial::NotOwner)
    }
}

/// Requires that the caller authored the task being deleted
pub fn require_author(caller: i64, author: i64) -> GuardResult {
    if caller == author {
        Ok(())
    } else {
        Err(Denial::NotAuthor)
    }
}

/// Runs an ordered pipeline of guard results, keeping the first denial
pub fn run<I>(guards: I) -> GuardResult
where
    I: IntoIterator<Item = GuardResult>,
{
    for guard in guards {
        guard?;
    }
    Ok(())
}
