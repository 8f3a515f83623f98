use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use tracing::instrument;

use crate::application::ports::{DogRepository, RepositoryError};
use crate::domain::{Dog, DogFilter, DogUpdate, NewDog};

const DOG_COLUMNS: &str = "id, name, picture, create_date, is_adopted, owner_id";

pub struct PgDogRepository {
    pool: PgPool,
}

impl PgDogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DogRow {
    id: i64,
    name: String,
    picture: String,
    create_date: DateTime<Utc>,
    is_adopted: bool,
    owner_id: Option<i64>,
}

impl From<DogRow> for Dog {
    fn from(row: DogRow) -> Self {
        Dog {
            id: row.id,
            name: row.name,
            picture: row.picture,
            is_adopted: row.is_adopted,
            owner_id: row.owner_id,
            create_date: row.create_date,
        }
    }
}

/// Classify constraint violations reported by the database. The store is
/// authoritative for name uniqueness and the owner foreign key.
fn map_write_error(e: sqlx::Error, name: &str, owner_id: Option<i64>) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        match db.kind() {
            ErrorKind::UniqueViolation => {
                return RepositoryError::DuplicateName(name.to_string());
            }
            ErrorKind::ForeignKeyViolation => {
                if let Some(owner) = owner_id {
                    return RepositoryError::UnknownOwner(owner);
                }
            }
            _ => {}
        }
    }
    RepositoryError::QueryFailed(e.to_string())
}

#[async_trait]
impl DogRepository for PgDogRepository {
    #[instrument(skip(self, new_dog), fields(name = %new_dog.name))]
    async fn create(&self, new_dog: NewDog) -> Result<Dog, RepositoryError> {
        let row = sqlx::query_as::<_, DogRow>(&format!(
            "INSERT INTO dogs (name, picture, is_adopted, owner_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DOG_COLUMNS}"
        ))
        .bind(&new_dog.name)
        .bind(&new_dog.picture)
        .bind(new_dog.is_adopted)
        .bind(new_dog.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &new_dog.name, new_dog.owner_id))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> Result<Option<Dog>, RepositoryError> {
        let row = sqlx::query_as::<_, DogRow>(&format!(
            "SELECT {DOG_COLUMNS} FROM dogs WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.map(Dog::from))
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> Result<Option<Dog>, RepositoryError> {
        let row = sqlx::query_as::<_, DogRow>(&format!(
            "SELECT {DOG_COLUMNS} FROM dogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(row.map(Dog::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: DogFilter) -> Result<Vec<Dog>, RepositoryError> {
        let rows = match filter.is_adopted {
            Some(adopted) => {
                sqlx::query_as::<_, DogRow>(&format!(
                    "SELECT {DOG_COLUMNS} FROM dogs WHERE is_adopted = $1 ORDER BY id"
                ))
                .bind(adopted)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, DogRow>(&format!(
                    "SELECT {DOG_COLUMNS} FROM dogs ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(rows.into_iter().map(Dog::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Dog>, RepositoryError> {
        let rows = sqlx::query_as::<_, DogRow>(&format!(
            "SELECT {DOG_COLUMNS} FROM dogs WHERE owner_id = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(rows.into_iter().map(Dog::from).collect())
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        name: &str,
        changes: DogUpdate,
    ) -> Result<Option<Dog>, RepositoryError> {
        if changes.is_empty() {
            return self.get_by_name(name).await;
        }

        let target_name = changes.name.clone().unwrap_or_else(|| name.to_string());
        let row = sqlx::query_as::<_, DogRow>(&format!(
            "UPDATE dogs \
             SET name = COALESCE($2, name), \
                 picture = COALESCE($3, picture), \
                 is_adopted = COALESCE($4, is_adopted), \
                 owner_id = COALESCE($5, owner_id) \
             WHERE name = $1 \
             RETURNING {DOG_COLUMNS}"
        ))
        .bind(name)
        .bind(changes.name)
        .bind(changes.picture)
        .bind(changes.is_adopted)
        .bind(changes.owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &target_name, changes.owner_id))?;

        Ok(row.map(Dog::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM dogs WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
