//! Order repository: records checkout submissions for manual follow-up.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use ironyard_core::OrderId;

use super::RepositoryError;
use crate::models::order::{NewOrder, Order, OrderItem};

/// Internal row type for the `orders` table.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    company: String,
    address: String,
    city: String,
    state: String,
    zip: String,
    country: String,
    total_price: Decimal,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Order {
        Order {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            address: self.address,
            city: self.city,
            state: self.state,
            zip: self.zip,
            country: self.country,
            total_price: self.total_price,
            created_at: self.created_at,
            items,
        }
    }
}

const ORDER_COLUMNS: &str = "id, first_name, last_name, email, phone, company, address, \
                             city, state, zip, country, total_price, created_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order and its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails; nothing is
    /// committed in that case.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let customer = &order.customer;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (id, first_name, last_name, email, phone, company,
                                address, city, state, zip, country, total_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.id)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(order.email.as_str())
        .bind(&customer.phone)
        .bind(&customer.company)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip)
        .bind(&customer.country)
        .bind(order.total_price)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(order.items.len());
        for (position, line) in order.items.iter().enumerate() {
            let quantity = i32::try_from(line.quantity.get()).map_err(|_| {
                RepositoryError::Conflict(format!("quantity out of range for {}", line.id))
            })?;
            let position = i32::try_from(position)
                .map_err(|_| RepositoryError::Conflict("too many order lines".to_string()))?;

            let item = sqlx::query_as::<_, OrderItem>(
                r"
                INSERT INTO order_items (order_id, position, product_id, name, image, quantity, price)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING product_id, name, image, quantity, price
                ",
            )
            .bind(order.id)
            .bind(position)
            .bind(&line.id)
            .bind(&line.name)
            .bind(&line.image)
            .bind(quantity)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            lines = items.len(),
            total = %order.total_price,
            "Order request recorded"
        );

        Ok(row.into_order(items))
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.items_for(row.id).await?;
                Ok(Some(row.into_order(items)))
            }
            None => Ok(None),
        }
    }

    /// Most recent orders first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            orders.push(row.into_order(items));
        }
        Ok(orders)
    }

    async fn items_for(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            r"
            SELECT product_id, name, image, quantity, price
            FROM order_items
            WHERE order_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }
}
