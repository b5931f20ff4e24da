// src/store/postgres.rs
use async_trait::async_trait;
use sqlx::PgPool;

use super::{Store, StoreError};
use crate::models::{auth::User, chat::ChatRecord};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM usuarios WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            "INSERT INTO usuarios (email, password_hash, created_at)
             VALUES ($1, $2, NOW())
             RETURNING id, email, password_hash, created_at",
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn record_chat(
        &self,
        email: &str,
        user_message: &str,
        model_response: &str,
    ) -> Result<ChatRecord, StoreError> {
        let record = sqlx::query_as::<_, ChatRecord>(
            "INSERT INTO historial_chats (usuario_email, mensaje_usuario, respuesta_ia)
             VALUES ($1, $2, $3)
             RETURNING id, usuario_email AS user_email, mensaje_usuario AS user_message,
                       respuesta_ia AS model_response, fecha AS created_at",
        )
        .bind(email)
        .bind(user_message)
        .bind(model_response)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn chat_history(&self, email: &str, limit: i64) -> Result<Vec<ChatRecord>, StoreError> {
        let records = sqlx::query_as::<_, ChatRecord>(
            "SELECT id, usuario_email AS user_email, mensaje_usuario AS user_message,
                    respuesta_ia AS model_response, fecha AS created_at
             FROM historial_chats
             WHERE usuario_email = $1
             ORDER BY fecha DESC, id DESC
             LIMIT $2",
        )
        .bind(email)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
