//! Repositories for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{DateRange, NewOrder, NewOrderTag, Order, OrderTag};

#[cfg(test)]
pub mod memory;

/// Storage operations on orders
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// All orders in storage order
    async fn list(&self) -> DatabaseResult<Vec<Order>>;

    /// Orders with `start_date >= range.start_date` and `embargo_date <= range.embargo_date`
    async fn filter_by_date_range(&self, range: &DateRange) -> DatabaseResult<Vec<Order>>;

    /// Persist a new order together with its tag relations
    async fn create(&self, new_order: &NewOrder) -> DatabaseResult<Order>;

    /// Set `is_active` to false. Returns false when no such order exists.
    async fn deactivate(&self, id: i64) -> DatabaseResult<bool>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> DatabaseResult<bool>;
}

/// Storage operations on order tags
#[async_trait]
pub trait OrderTagStore: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<OrderTag>>;

    async fn create(&self, new_tag: &NewOrderTag) -> DatabaseResult<OrderTag>;

    /// The subset of `ids` that match no stored tag
    async fn missing_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<i64>>;
}

/// Orders joined with their tag ids; callers append an optional `WHERE` and the grouping
macro_rules! select_orders {
    () => {
        r#"
    SELECT o.id, o.start_date, o.embargo_date, o.is_active,
           COALESCE(
               ARRAY_AGG(ot.order_tag_id ORDER BY ot.order_tag_id)
                   FILTER (WHERE ot.order_tag_id IS NOT NULL),
               '{}'
           ) AS tags
    FROM orders o
    LEFT JOIN orders_tags ot ON ot.order_id = o.id
"#
    };
}

macro_rules! group_orders {
    () => {
        r#"
    GROUP BY o.id
    ORDER BY o.id
"#
    };
}

const LIST_ORDERS: &str = concat!(select_orders!(), group_orders!());

const FILTER_ORDERS: &str = concat!(
    select_orders!(),
    "    WHERE o.start_date >= $1 AND o.embargo_date <= $2",
    group_orders!()
);

fn order_from_row(row: &PgRow) -> Order {
    Order {
        id: row.get("id"),
        start_date: row.get("start_date"),
        embargo_date: row.get("embargo_date"),
        is_active: row.get("is_active"),
        tags: row.get("tags"),
    }
}

/// Order repository for database operations
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for OrderRepository {
    async fn list(&self) -> DatabaseResult<Vec<Order>> {
        let rows = sqlx::query(LIST_ORDERS)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(order_from_row).collect())
    }

    async fn filter_by_date_range(&self, range: &DateRange) -> DatabaseResult<Vec<Order>> {
        let rows = sqlx::query(FILTER_ORDERS)
            .bind(range.start_date)
            .bind(range.embargo_date)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(order_from_row).collect())
    }

    async fn create(&self, new_order: &NewOrder) -> DatabaseResult<Order> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::Query)?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (start_date, embargo_date, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, start_date, embargo_date, is_active
            "#,
        )
        .bind(new_order.start_date)
        .bind(new_order.embargo_date)
        .bind(new_order.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        let id: i64 = row.get("id");

        if !new_order.tags.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO orders_tags (order_id, order_tag_id)
                SELECT $1, UNNEST($2::BIGINT[])
                "#,
            )
            .bind(id)
            .bind(new_order.tags.as_slice())
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::from_query)?;
        }

        tx.commit().await.map_err(DatabaseError::Query)?;
        info!("Created order {}", id);

        Ok(Order {
            id,
            start_date: row.get("start_date"),
            embargo_date: row.get("embargo_date"),
            is_active: row.get("is_active"),
            tags: new_order.tags.clone(),
        })
    }

    async fn deactivate(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET is_active = FALSE
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> DatabaseResult<bool> {
        common::database::health_check(&self.pool).await
    }
}

/// Order tag repository for database operations
#[derive(Clone)]
pub struct OrderTagRepository {
    pool: PgPool,
}

impl OrderTagRepository {
    /// Create a new order tag repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderTagStore for OrderTagRepository {
    async fn list(&self) -> DatabaseResult<Vec<OrderTag>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name
            FROM order_tags
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let tags = rows
            .into_iter()
            .map(|row| OrderTag {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect();

        Ok(tags)
    }

    async fn create(&self, new_tag: &NewOrderTag) -> DatabaseResult<OrderTag> {
        let row = sqlx::query(
            r#"
            INSERT INTO order_tags (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(&new_tag.name)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(OrderTag {
            id: row.get("id"),
            name: row.get("name"),
        })
    }

    async fn missing_ids(&self, ids: &[i64]) -> DatabaseResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM order_tags WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_queries_share_projection() {
        let (list_select, list_group) = LIST_ORDERS.split_at(LIST_ORDERS.find("GROUP BY").unwrap());
        assert!(FILTER_ORDERS.starts_with(list_select));
        assert!(FILTER_ORDERS.ends_with(list_group));
        assert!(FILTER_ORDERS.contains("o.start_date >= $1 AND o.embargo_date <= $2"));
        assert!(!LIST_ORDERS.contains("WHERE o."));
    }
}
