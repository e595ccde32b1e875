use async_trait::async_trait;
use models::{errors::ModelError, user};
use sea_orm::{ActiveValue::NotSet, ConnectionTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::debug;

use super::{BackendKind, StorageError, UserBackend};
use crate::User;

/// Users persisted as rows of the `users` table.
///
/// The table is created if absent before every read and write. A write
/// truncates the table (restarting the id sequence) and re-inserts the given
/// users in order, so stored ids are reassigned by the database. The truncate
/// and the inserts are separate statements with no surrounding transaction.
#[derive(Clone, Debug)]
pub struct RelationalBackend {
    db: DatabaseConnection,
}

impl RelationalBackend {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    pub async fn connect(url: &str) -> Result<Self, StorageError> {
        let db = models::db::connect(url).await.map_err(|e| match e {
            ModelError::Db(msg) | ModelError::Validation(msg) => StorageError::Db(msg),
        })?;
        Ok(Self::new(db))
    }

    async fn ensure_schema(&self) -> Result<(), StorageError> {
        let backend = self.db.get_database_backend();
        self.db.execute(user::create_table_statement(backend)).await?;
        Ok(())
    }
}

#[async_trait]
impl UserBackend for RelationalBackend {
    fn kind(&self) -> BackendKind { BackendKind::Relational }

    async fn read_all(&self) -> Result<Vec<User>, StorageError> {
        self.ensure_schema().await?;
        let users = user::Entity::find().order_by_asc(user::Column::Id).all(&self.db).await?;
        Ok(users)
    }

    async fn write_all(&self, users: &[User]) -> Result<(), StorageError> {
        self.ensure_schema().await?;
        let backend = self.db.get_database_backend();
        for stmt in user::truncate_statements(backend) {
            self.db.execute(stmt).await?;
        }
        for u in users {
            let am = user::ActiveModel { id: NotSet, name: Set(u.name.clone()), email: Set(u.email.clone()) };
            user::Entity::insert(am).exec(&self.db).await?;
        }
        debug!(count = users.len(), "users table replaced");
        Ok(())
    }
}
