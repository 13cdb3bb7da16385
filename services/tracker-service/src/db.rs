use tokio_postgres::{Client, NoTls};

use crate::models::TrackerEvent;

const SQL_INSERT_EVENT: &str =
    "INSERT INTO tracker (page_name, page_id, request_ip) VALUES ($1, $2, $3)";
const SQL_LIST_EVENTS: &str = "SELECT id, created_at, page_name, page_id, request_ip \
FROM tracker ORDER BY created_at DESC, id DESC LIMIT $1";

/// Most recent rows returned by one list call. Fixed server-side, never
/// client-controlled.
pub const LIST_LIMIT: i64 = 1000;

#[derive(Debug)]
pub enum StoreError {
    Connect(tokio_postgres::Error),
    Insert(tokio_postgres::Error),
    Query(tokio_postgres::Error),
}

/// One store connection scoped to a single request. Dropping the value
/// releases the connection on every exit path.
pub struct Store {
    client: Client,
}

impl Store {
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls)
            .await
            .map_err(StoreError::Connect)?;
        tokio::spawn(async move {
            // Drive the connection until the client is dropped.
            if let Err(err) = connection.await {
                tracing::error!(error = %err, "database connection error");
            }
        });
        Ok(Self { client })
    }

    /// Inserts one event row; `id` and `created_at` are assigned by the
    /// store and not read back. An uncommitted transaction rolls back when
    /// dropped, so a failed insert leaves no partial row behind.
    pub async fn insert_event(
        &mut self,
        page_name: &str,
        page_id: &str,
        request_ip: &str,
    ) -> Result<(), StoreError> {
        let tx = self
            .client
            .transaction()
            .await
            .map_err(StoreError::Insert)?;
        tx.execute(SQL_INSERT_EVENT, &[&page_name, &page_id, &request_ip])
            .await
            .map_err(StoreError::Insert)?;
        tx.commit().await.map_err(StoreError::Insert)
    }

    /// Most recent events first; `id` breaks ties between rows created in
    /// the same instant.
    pub async fn list_recent_events(&self) -> Result<Vec<TrackerEvent>, StoreError> {
        let rows = self
            .client
            .query(SQL_LIST_EVENTS, &[&LIST_LIMIT])
            .await
            .map_err(StoreError::Query)?;

        Ok(rows
            .into_iter()
            .map(|row| TrackerEvent {
                id: row.get("id"),
                created_at: row.get("created_at"),
                page_name: row.get("page_name"),
                page_id: row.get("page_id"),
                request_ip: row.get("request_ip"),
            })
            .collect())
    }
}
