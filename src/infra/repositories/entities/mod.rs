//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod item;

use sea_orm::EntityTrait;
use uuid::Uuid;

pub use item::{ActiveModel as ItemActiveModel, Entity as ItemEntity, Model as ItemModel};

/// Entity keyed by a single UUID column.
///
/// Implemented by every table the generic repository works with.
pub trait BaseEntity: EntityTrait {
    /// Name used in log lines and error messages
    const NAME: &'static str;

    fn id_column() -> Self::Column;

    fn id_of(model: &Self::Model) -> Uuid;
}
