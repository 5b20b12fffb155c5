use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;

use super::connection::JsonConnection;
use crate::storage::traits::SessionStorage;

const SESSION_FILE: &str = "session.yaml";

/// Session-scoped state, separate from the entity stores.
///
/// Carries the id handed from the dashboard to the class editor when a
/// record is opened for editing. One-shot: the editor reads it and
/// clears it.
#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionState {
    editing_activity_id: Option<String>,
}

/// YAML-file session state repository.
#[derive(Clone)]
pub struct SessionRepository {
    connection: JsonConnection,
}

impl SessionRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn read_state(&self) -> Result<SessionState> {
        let path = self.connection.store_path(SESSION_FILE);
        if !path.exists() {
            return Ok(SessionState::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("reading session file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("malformed session file {}", path.display()))
    }

    fn write_state(&self, state: &SessionState) -> Result<()> {
        let path = self.connection.store_path(SESSION_FILE);
        let contents = serde_yaml::to_string(state).context("serializing session state")?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("writing session file {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("replacing session file {}", path.display()))?;
        Ok(())
    }
}

impl SessionStorage for SessionRepository {
    fn set_editing_activity(&self, activity_id: &str) -> Result<()> {
        self.write_state(&SessionState {
            editing_activity_id: Some(activity_id.to_string()),
        })?;
        info!("session: editing activity set to {}", activity_id);
        Ok(())
    }

    fn editing_activity(&self) -> Result<Option<String>> {
        Ok(self.read_state()?.editing_activity_id)
    }

    fn clear_editing_activity(&self) -> Result<()> {
        self.write_state(&SessionState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mailbox_set_read_clear() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let repo = SessionRepository::new(connection);

        // Nothing in the mailbox at first.
        assert!(repo.editing_activity().unwrap().is_none());

        repo.set_editing_activity("1757000000000").unwrap();
        assert_eq!(
            repo.editing_activity().unwrap().as_deref(),
            Some("1757000000000")
        );

        repo.clear_editing_activity().unwrap();
        assert!(repo.editing_activity().unwrap().is_none());
    }
}
