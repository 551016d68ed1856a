use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "anime")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub native_title: Option<String>,
    /// Free text, e.g. "Airing", "Finished Airing", "Not yet aired".
    pub status: Option<String>,
    /// TV, Movie, OVA, ONA, Special...
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub synopsis: Option<String>,
    pub episodes_total: Option<i32>,
    pub release_date: Option<Date>,
    pub end_date: Option<Date>,
    pub cover_url: Option<String>,
    pub studio_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::studios::Entity",
        from = "Column::StudioId",
        to = "super::studios::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Studios,
}

impl Related<super::studios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Studios.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
