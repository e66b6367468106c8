use sea_orm::entity::prelude::*;

/// Append-only log of hook delivery attempts.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_hook_deliveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub hook_id: Uuid,
    pub event: String,
    pub payload: Json,
    pub status_code: Option<i32>,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payment_hooks::Entity",
        from = "Column::HookId",
        to = "super::payment_hooks::Column::Id",
        on_delete = "Cascade"
    )]
    Hook,
}

impl Related<super::payment_hooks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
