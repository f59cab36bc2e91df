pub mod models;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use models::{User, UserRow, UserState};

/// Durable storage of per-chat user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load the user for `chat_id`, creating it with `default_state` and no
    /// voice selected on first contact.
    async fn get_or_create(&self, chat_id: i64, default_state: UserState) -> anyhow::Result<User>;

    /// Persist state, API key and selected voice of an existing user.
    async fn save(&self, user: &User) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS tg_users (
                chat_id BIGINT PRIMARY KEY,
                state TEXT NOT NULL DEFAULT 'NORMAL',
                api_key TEXT NOT NULL DEFAULT '',
                voice_id BIGINT NOT NULL DEFAULT -1,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )"#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for Database {
    async fn get_or_create(&self, chat_id: i64, default_state: UserState) -> anyhow::Result<User> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO tg_users (chat_id, state, voice_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (chat_id) DO UPDATE SET chat_id = EXCLUDED.chat_id
            RETURNING chat_id, state, api_key, voice_id, created_at, updated_at
            "#,
        )
        .bind(chat_id)
        .bind(default_state.as_str())
        .bind(models::NO_VOICE)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE tg_users
            SET state = $2, api_key = $3, voice_id = $4, updated_at = NOW()
            WHERE chat_id = $1
            "#,
        )
        .bind(user.chat_id)
        .bind(user.state.as_str())
        .bind(&user.api_key)
        .bind(user.voice_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("user {} does not exist", user.chat_id);
        }
        Ok(())
    }
}
