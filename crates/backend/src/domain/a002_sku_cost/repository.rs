use chrono::Utc;
use contracts::domain::a002_sku_cost::SkuCostDto;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_sku_cost")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub sku: String,
    pub unit_cost: f64,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SkuCostDto {
    fn from(m: Model) -> Self {
        SkuCostDto {
            sku: m.sku,
            unit_cost: m.unit_cost,
            updated_at: m.updated_at,
        }
    }
}

pub async fn list_all(conn: &DatabaseConnection) -> anyhow::Result<Vec<SkuCostDto>> {
    let items = Entity::find()
        .order_by_asc(Column::Sku)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_sku(conn: &DatabaseConnection, sku: &str) -> anyhow::Result<Option<SkuCostDto>> {
    let result = Entity::find_by_id(sku.to_string()).one(conn).await?;
    Ok(result.map(Into::into))
}

/// Insert or replace the cost of a SKU
pub async fn upsert(
    conn: &DatabaseConnection,
    sku: &str,
    unit_cost: f64,
) -> anyhow::Result<SkuCostDto> {
    let now = Utc::now();
    let active = ActiveModel {
        sku: Set(sku.to_string()),
        unit_cost: Set(unit_cost),
        updated_at: Set(Some(now)),
    };
    Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::Sku)
                .update_columns([Column::UnitCost, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    Ok(SkuCostDto {
        sku: sku.to_string(),
        unit_cost,
        updated_at: Some(now),
    })
}

pub async fn delete(conn: &DatabaseConnection, sku: &str) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(sku.to_string()).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
