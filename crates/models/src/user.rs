use sea_orm::{entity::prelude::*, DbBackend, Schema, Statement};
use serde::{Deserialize, Serialize};

use crate::errors;

/// A stored user. Also the on-disk/on-wire JSON record: `{"id","name","email"}`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// User fields supplied by a client; the id is always assigned server-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), errors::ModelError> {
        validate_name(&self.name)?;
        validate_email(&self.email)
    }

    pub fn into_user(self, id: i32) -> Model {
        Model { id, name: self.name, email: self.email }
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

/// Only presence is checked; the address format is not validated.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if email.trim().is_empty() { return Err(errors::ModelError::Validation("email required".into())); }
    Ok(())
}

/// `CREATE TABLE IF NOT EXISTS users (...)` for the given backend.
pub fn create_table_statement(backend: DbBackend) -> Statement {
    let schema = Schema::new(backend);
    let mut table = schema.create_table_from_entity(Entity);
    table.if_not_exists();
    backend.build(&table)
}

/// Empty the table and reset its id sequence so the next insert gets id 1.
pub fn truncate_statements(backend: DbBackend) -> Vec<Statement> {
    let raw = |sql: &str| Statement::from_string(backend, sql.to_owned());
    match backend {
        DbBackend::Postgres => vec![raw(r#"TRUNCATE TABLE "users" RESTART IDENTITY"#)],
        DbBackend::Sqlite => vec![
            raw(r#"DELETE FROM "users""#),
            raw(r#"DELETE FROM "sqlite_sequence" WHERE "name" = 'users'"#),
        ],
        _ => vec![raw("TRUNCATE TABLE `users`")],
    }
}
