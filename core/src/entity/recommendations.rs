use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recommendations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub source: String,
    pub profile_snapshot: Json,
    pub recommendation_snapshot: Json,
    pub image_analysis: Option<Json>,
    pub image_url: Option<String>,
    pub analysis_scores: Option<Json>,
    pub image_data: Option<Vec<u8>>,
    pub image_mime_type: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
