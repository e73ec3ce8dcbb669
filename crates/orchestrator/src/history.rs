//! Per-user conversation history with a bounded window.

use brain_core::{HistoryMessage, Role};
use database::{history, Database};
use tracing::warn;

/// Stores conversation turns and keeps only the most recent ones.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    db: Database,
    max_history: i64,
}

impl HistoryStore {
    /// Create a store keeping `max_history` turns per user.
    pub fn new(db: Database, max_history: i64) -> Self {
        Self {
            db,
            max_history: max_history.max(1),
        }
    }

    /// Window size.
    pub fn max_history(&self) -> i64 {
        self.max_history
    }

    /// Append a turn, then drop everything outside the window.
    ///
    /// A failed trim is logged and ignored; the next append trims again.
    pub async fn append(&self, user_id: i64, role: Role, content: &str) -> database::Result<()> {
        history::append_history(self.db.pool(), user_id, role.as_str(), content).await?;

        if let Err(e) =
            history::delete_history_except_recent(self.db.pool(), user_id, self.max_history).await
        {
            warn!("Failed to trim history for user {}: {}", user_id, e);
        }

        Ok(())
    }

    /// Up to `max_history` turns, oldest first.
    pub async fn recent(&self, user_id: i64) -> database::Result<Vec<HistoryMessage>> {
        let mut entries = history::read_history(self.db.pool(), user_id, self.max_history).await?;
        entries.reverse();

        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry.role.parse::<Role>() {
                Ok(role) => Some(HistoryMessage {
                    role,
                    content: entry.content,
                }),
                Err(e) => {
                    warn!("Skipping history row {}: {}", entry.id, e);
                    None
                }
            })
            .collect())
    }
}
