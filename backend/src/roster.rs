//! Startup import of the alumni roster.
//!
//! The roster is a JSON array of `{fullName, email, rollNumber?, city?,
//! state?, country?}` objects. Every entry becomes an unclaimed profile;
//! emails already in the directory are skipped, so re-running the import is
//! harmless.

use std::path::{Path, PathBuf};

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::domain::RosterEntry;
use crate::domain::ports::{AlumniRepository, AlumniRepositoryError};
use crate::files::read_file;

/// Errors returned while importing the roster.
#[derive(Debug, Error)]
pub enum RosterImportError {
    #[error("failed to read roster at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("roster at {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Repository(#[from] AlumniRepositoryError),
}

/// Parse the roster file at `path`.
pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, RosterImportError> {
    let payload = read_file(path).map_err(|source| RosterImportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&payload).map_err(|source| RosterImportError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Import the roster at `path`, returning the number of new profiles.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
///
/// use backend::outbound::memory::InMemoryStore;
/// use backend::roster::import_roster_file;
/// use mockable::DefaultClock;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// let inserted = import_roster_file(Path::new("roster.json"), &store, &DefaultClock).await?;
/// println!("{inserted} profiles added");
/// # Ok(())
/// # }
/// ```
pub async fn import_roster_file(
    path: &Path,
    alumni: &dyn AlumniRepository,
    clock: &dyn Clock,
) -> Result<usize, RosterImportError> {
    let entries = load_roster(path)?;
    let inserted = alumni.import_roster(&entries, clock.utc()).await?;
    info!(
        path = %path.display(),
        total = entries.len(),
        inserted,
        "roster imported"
    );
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use crate::domain::ports::AlumniRepository as _;
    use crate::outbound::memory::InMemoryStore;
    use crate::test_support::MutableClock;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write_roster(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("roster.json");
        std::fs::write(&path, contents).expect("write roster");
        (dir, path)
    }

    const ROSTER: &str = r#"[
        {"fullName": "Bhavik Parmar", "email": "Bhavik@Roster.example", "rollNumber": 12, "city": "Pune"},
        {"fullName": "Anita Rao", "email": "anita@roster.example"}
    ]"#;

    #[rstest]
    #[tokio::test]
    async fn import_is_idempotent_by_email() {
        let (_dir, path) = write_roster(ROSTER);
        let store = InMemoryStore::new();
        let clock = MutableClock::default();

        let first = import_roster_file(&path, &store, &clock).await.expect("first import");
        let second = import_roster_file(&path, &store, &clock).await.expect("second import");

        assert_eq!((first, second), (2, 0));
        let email = EmailAddress::new("bhavik@roster.example").expect("email");
        let profile = store
            .find_by_email(&email)
            .await
            .expect("lookup")
            .expect("imported profile");
        assert_eq!(profile.roll_number, Some(12));
        assert!(!profile.is_claimed());
    }

    #[rstest]
    #[case(r#"{"fullName": "not an array"}"#)]
    #[case(r#"[{"fullName": "Bhavik Parmar", "email": "not-an-email"}]"#)]
    #[case(r#"[{"fullName": "Bhavik Parmar", "email": "b@roster.example", "nickname": "B"}]"#)]
    fn malformed_rosters_are_parse_errors(#[case] contents: &str) {
        let (_dir, path) = write_roster(contents);

        let err = load_roster(&path).expect_err("malformed roster");

        assert!(matches!(err, RosterImportError::Parse { .. }), "{err}");
    }

    #[rstest]
    fn missing_roster_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");

        let err = load_roster(&dir.path().join("absent.json")).expect_err("missing roster");

        assert!(matches!(err, RosterImportError::Read { .. }));
    }
}
