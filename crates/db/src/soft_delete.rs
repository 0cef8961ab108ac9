//! Soft-delete and ownership scoping for reads.
//!
//! Rows are never physically removed; deleting sets `deleted_at`. Every
//! repository read starts from [`SoftDelete::find_live`] or
//! [`SoftDelete::find_live_owned`], so a deleted row can never leak into a
//! balance, a list, or a summary.
//!
//! ```ignore
//! use caja_db::SoftDelete;
//!
//! let rows = incomes::Entity::find_live_owned(user_id).all(&db).await?;
//! ```

use caja_shared::types::UserId;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::entities::{accounts, categories, expenses, incomes, transfers};

/// Entities with an owner and a soft-delete timestamp.
pub trait SoftDelete: EntityTrait {
    /// The nullable `deleted_at` column.
    fn deleted_at() -> Self::Column;

    /// The owning user column.
    fn owner() -> Self::Column;

    /// Rows that have not been deleted.
    fn find_live() -> Select<Self> {
        Self::find().filter(Self::deleted_at().is_null())
    }

    /// Rows of `user` that have not been deleted.
    fn find_live_owned(user: UserId) -> Select<Self> {
        Self::find_live().filter(Self::owner().eq(user.into_inner()))
    }
}

macro_rules! soft_delete {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDelete for $module::Entity {
                fn deleted_at() -> Self::Column {
                    $module::Column::DeletedAt
                }

                fn owner() -> Self::Column {
                    $module::Column::UserId
                }
            }
        )+
    };
}

soft_delete!(accounts, categories, incomes, expenses, transfers);
