//! Order request follow-up commands.

use tracing::info;

use ironyard_core::OrderId;
use ironyard_storefront::db::OrderRepository;
use ironyard_storefront::models::order::Order;

use super::connect;

/// Print the most recent order requests.
///
/// # Errors
///
/// Returns an error if the database is unreachable or the query fails.
pub async fn list(limit: i64) -> Result<(), Box<dyn std::error::Error>> {
    if limit < 1 {
        return Err("--limit must be at least 1".into());
    }

    let pool = connect().await?;
    let orders = OrderRepository::new(&pool).list_recent(limit).await?;

    if orders.is_empty() {
        info!("No order requests recorded");
        return Ok(());
    }

    for order in &orders {
        print_order(order);
    }

    Ok(())
}

/// Print one order request with its lines.
///
/// # Errors
///
/// Returns an error if the database is unreachable, the query fails or no
/// order has this id.
pub async fn show(id: OrderId) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect().await?;
    let order = OrderRepository::new(&pool)
        .get(id)
        .await?
        .ok_or_else(|| format!("No order request with id {id}"))?;

    print_order(&order);
    info!(
        "    {} | {}, {}, {} {} {}",
        order.phone, order.address, order.city, order.state, order.zip, order.country
    );
    Ok(())
}

fn print_order(order: &Order) {
    info!(
        "{} | {} | {} {} <{}> {} | {} lines | total {}",
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.id,
        order.first_name,
        order.last_name,
        order.email,
        order.company,
        order.items.len(),
        order.total_price,
    );
    for item in &order.items {
        info!(
            "    {} x {} ({}) @ {}",
            item.quantity, item.name, item.product_id, item.price
        );
    }
}
