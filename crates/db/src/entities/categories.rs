//! `SeaORM` Entity for categories table.

use caja_core::ledger::{CategoryInfo, CategoryKind};
use caja_shared::types::{CategoryId, UserId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: String,
    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Which side of the ledger the category belongs to.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored kind is unknown.
    pub fn kind(&self) -> Result<CategoryKind, DbErr> {
        self.kind
            .parse()
            .map_err(|err: String| DbErr::Type(format!("stored category kind: {err}")))
    }

    /// The facts movement validation needs about this category.
    ///
    /// # Errors
    ///
    /// Returns `DbErr::Type` if the stored kind is unknown.
    pub fn info(&self) -> Result<CategoryInfo, DbErr> {
        Ok(CategoryInfo {
            id: CategoryId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            kind: self.kind()?,
            deleted: self.deleted_at.is_some(),
        })
    }
}
