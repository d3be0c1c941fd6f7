use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_rankings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub date: Date,
    pub github_stars: Option<i64>,
    pub github_forks: Option<i64>,
    pub npm_downloads: Option<i64>,
    pub reddit_mentions: Option<i64>,
    pub github_z_score: f64,
    pub npm_z_score: f64,
    pub reddit_z_score: f64,
    pub momentum_score: f64,
    pub prev_score: Option<f64>,
    pub delta_vs_prev: Option<f64>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
