use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::errors::ModelError;

/// Open a connection pool for the given URL.
///
/// Kept deliberately small: the user store issues one statement at a time.
pub async fn connect(url: &str) -> Result<DatabaseConnection, ModelError> {
    let mut opts = ConnectOptions::new(url.to_owned());
    opts.max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(false);
    let db = Database::connect(opts).await.map_err(|e| ModelError::Db(e.to_string()))?;
    info!(backend = ?db.get_database_backend(), "database connected");
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryOrder, Set, ActiveModelTrait};

    use crate::user;

    #[tokio::test]
    async fn sqlite_schema_insert_and_truncate() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("models_db_{}.sqlite", uuid::Uuid::new_v4()));
        let db = connect(&format!("sqlite://{}?mode=rwc", path.display())).await?;
        assert_eq!(db.get_database_backend(), DbBackend::Sqlite);

        // create twice: second call must be a no-op
        db.execute(user::create_table_statement(DbBackend::Sqlite)).await?;
        db.execute(user::create_table_statement(DbBackend::Sqlite)).await?;

        for name in ["a", "b"] {
            user::ActiveModel { name: Set(name.into()), email: Set(format!("{name}@x")), ..Default::default() }
                .insert(&db)
                .await?;
        }
        let rows = user::Entity::find().order_by_asc(user::Column::Id).all(&db).await?;
        assert_eq!(rows.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);

        for stmt in user::truncate_statements(DbBackend::Sqlite) {
            db.execute(stmt).await?;
        }
        assert!(user::Entity::find().all(&db).await?.is_empty());

        let again = user::ActiveModel { name: Set("c".into()), email: Set("c@x".into()), ..Default::default() }
            .insert(&db)
            .await?;
        assert_eq!(again.id, 1);

        drop(db);
        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
