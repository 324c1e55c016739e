use crate::errors::{AppError, ResultExt};
use crate::models::Lead;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Storage for scored leads.
///
/// Listing order is score descending; leads with equal scores keep their
/// insertion order.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Store a batch of leads. Either all of them are stored or none.
    async fn insert_many(&self, leads: &[Lead]) -> Result<(), AppError>;

    /// Every lead, highest score first.
    async fn list_all(&self) -> Result<Vec<Lead>, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError>;

    /// Remove every lead, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, AppError>;
}

/// Process-local store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryLeadStore {
    leads: RwLock<Vec<Lead>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert_many(&self, leads: &[Lead]) -> Result<(), AppError> {
        self.leads.write().await.extend_from_slice(leads);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        let mut leads = self.leads.read().await.clone();
        // Stable sort keeps insertion order among equal scores
        leads.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(leads)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self.leads.read().await.iter().find(|l| l.id == id).cloned())
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let mut leads = self.leads.write().await;
        let removed = leads.len() as u64;
        leads.clear();
        Ok(removed)
    }
}

/// PostgreSQL-backed store over the `leads` table.
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn insert_many(&self, leads: &[Lead]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.context("Starting lead insert")?;

        for lead in leads {
            sqlx::query(
                "INSERT INTO leads
                    (id, name, phone, email, source, service_interest, location, timestamp, score, category, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
            )
            .bind(lead.id)
            .bind(&lead.name)
            .bind(&lead.phone)
            .bind(&lead.email)
            .bind(&lead.source)
            .bind(&lead.service_interest)
            .bind(&lead.location)
            .bind(&lead.timestamp)
            .bind(i32::from(lead.score))
            .bind(lead.category.as_str())
            .bind(lead.created_at)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Inserting lead {}", lead.id))?;
        }

        tx.commit().await.context("Committing lead insert")?;
        tracing::debug!("Stored {} lead(s) in PostgreSQL", leads.len());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads ORDER BY score DESC, created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Listing leads")?;

        Ok(leads)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Fetching lead {}", id))?;

        Ok(lead)
    }

    async fn delete_all(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM leads")
            .execute(&self.pool)
            .await
            .context("Deleting leads")?;

        Ok(result.rows_affected())
    }
}
