//! Cart database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::Cart;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItem,
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Cart {
    fn from(model: Model) -> Self {
        Cart {
            id: model.id,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}
