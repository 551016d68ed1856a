use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "character_voice_actors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub character_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub voice_actor_id: i32,
    /// e.g. "Japanese", "English"
    pub language: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::characters::Entity",
        from = "Column::CharacterId",
        to = "super::characters::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Characters,
    #[sea_orm(
        belongs_to = "super::voice_actors::Entity",
        from = "Column::VoiceActorId",
        to = "super::voice_actors::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    VoiceActors,
}

impl Related<super::characters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Characters.def()
    }
}

impl Related<super::voice_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoiceActors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
