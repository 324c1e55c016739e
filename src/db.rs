use sqlx::{postgres::PgPoolOptions, PgPool};

const CREATE_LEADS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS leads (
    id               UUID PRIMARY KEY,
    name             TEXT NOT NULL,
    phone            TEXT NOT NULL,
    email            TEXT,
    source           TEXT NOT NULL,
    service_interest TEXT NOT NULL,
    location         TEXT NOT NULL,
    timestamp        TEXT NOT NULL,
    score            INTEGER NOT NULL CHECK (score BETWEEN 0 AND 100),
    category         TEXT NOT NULL CHECK (category IN ('Hot', 'Warm', 'Cold')),
    created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_SCORE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS leads_score_idx ON leads (score DESC, created_at ASC)";

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_LEADS_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_SCORE_INDEX).execute(&pool).await?;

        Ok(Self { pool })
    }
}
