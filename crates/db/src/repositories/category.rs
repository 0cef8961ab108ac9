//! Category repository.

use caja_core::ledger::{CategoryInfo, CategoryKind};
use caja_shared::AppError;
use caja_shared::types::{CategoryId, UserId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::categories;
use crate::soft_delete::SoftDelete;

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found, deleted, or owned by someone else.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Category name is empty.
    #[error("Category name must not be empty")]
    EmptyName,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<CategoryError> for AppError {
    fn from(err: CategoryError) -> Self {
        match err {
            CategoryError::NotFound(_) => Self::NotFound(err.to_string()),
            CategoryError::EmptyName => Self::Validation(err.to_string()),
            CategoryError::Database(err) => Self::Database(err.to_string()),
        }
    }
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Owner.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Incomes or expenses.
    pub kind: CategoryKind,
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::EmptyName` for a blank name.
    pub async fn create_category(
        &self,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(CategoryError::EmptyName);
        }

        let category = categories::ActiveModel {
            id: Set(CategoryId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            name: Set(name.to_string()),
            kind: Set(input.kind.as_str().to_string()),
            created_at: Set(Utc::now()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(
            user_id = %input.user_id,
            category_id = %category.id,
            kind = %input.kind,
            "Category created"
        );
        Ok(category)
    }

    /// Lists the user's live categories, optionally of one kind, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_categories(
        &self,
        user: UserId,
        kind: Option<CategoryKind>,
    ) -> Result<Vec<categories::Model>, CategoryError> {
        let mut query = categories::Entity::find_live_owned(user);
        if let Some(kind) = kind {
            query = query.filter(categories::Column::Kind.eq(kind.as_str()));
        }

        let categories = query
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;
        Ok(categories)
    }

    /// Finds one of the user's live categories.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it is missing, deleted, or foreign.
    pub async fn find_category(
        &self,
        user: UserId,
        id: CategoryId,
    ) -> Result<categories::Model, CategoryError> {
        categories::Entity::find_live_owned(user)
            .filter(categories::Column::Id.eq(id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(CategoryError::NotFound(id.into_inner()))
    }

    /// Soft-deletes a category. Movements keep their reference.
    ///
    /// # Errors
    ///
    /// Returns `CategoryError::NotFound` if it is missing, deleted, or foreign.
    pub async fn delete_category(&self, user: UserId, id: CategoryId) -> Result<(), CategoryError> {
        let existing = self.find_category(user, id).await?;

        let mut active: categories::ActiveModel = existing.into();
        active.deleted_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;

        info!(user_id = %user, category_id = %id, "Category deleted");
        Ok(())
    }

    /// Loads any category by id, deleted or not, for movement validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn fetch_info<C: ConnectionTrait>(
        conn: &C,
        id: CategoryId,
    ) -> Result<Option<CategoryInfo>, DbErr> {
        categories::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .map(|category| category.info())
            .transpose()
    }
}
