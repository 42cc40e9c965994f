//! Order requests recorded at checkout for manual follow-up.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ironyard_core::cart::CartLineItem;
use ironyard_core::{Email, EmailError, OrderId, ProductId};

/// Contact and shipping details entered on the checkout form.
///
/// Every field defaults to empty; only `email` is validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// `POST /api/orders` body: customer details plus the client's cart lines.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    #[serde(flatten)]
    pub customer: CustomerDetails,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}

/// `POST /api/checkout` body: the cart comes from the session.
pub type CheckoutRequest = CustomerDetails;

/// Largest unit price `order_items.price NUMERIC(12,2)` holds.
const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Largest total `orders.total_price NUMERIC(14,2)` holds.
const MAX_ORDER_TOTAL: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Largest quantity `order_items.quantity INTEGER` holds.
const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Money is stored with two decimal places.
const MONEY_SCALE: u32 = 2;

/// Why an order request was refused before reaching the database.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid email address")]
    InvalidEmail(#[source] EmailError),

    #[error("Quantity for {0} is too large")]
    QuantityOutOfRange(ProductId),

    #[error("Price for {0} is out of range")]
    PriceOutOfRange(ProductId),

    #[error("Order total is out of range")]
    TotalOutOfRange,
}

/// A validated order ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub email: Email,
    pub total_price: Decimal,
    pub items: Vec<CartLineItem>,
}

impl NewOrder {
    /// Validate a submission.
    ///
    /// Line items arrive already checked for quantity >= 1 and non-negative
    /// prices by their deserializer. A missing total is computed from them.
    /// Quantities, prices and the total must fit the order columns exactly,
    /// so a request that passes here is never refused by the database.
    ///
    /// # Errors
    ///
    /// Returns `OrderValidationError::EmptyCart` when there are no items, then
    /// `OrderValidationError::InvalidEmail` when the email does not parse, then
    /// the first out-of-range quantity, price or total.
    pub fn validate(
        customer: CustomerDetails,
        items: Vec<CartLineItem>,
        total_price: Option<Decimal>,
    ) -> Result<Self, OrderValidationError> {
        if items.is_empty() {
            return Err(OrderValidationError::EmptyCart);
        }
        let email = Email::parse(&customer.email).map_err(OrderValidationError::InvalidEmail)?;

        for item in &items {
            if item.quantity.get() > MAX_LINE_QUANTITY {
                return Err(OrderValidationError::QuantityOutOfRange(item.id.clone()));
            }
            if !fits_money_column(item.price, MAX_UNIT_PRICE) {
                return Err(OrderValidationError::PriceOutOfRange(item.id.clone()));
            }
        }

        let total_price = total_price.unwrap_or_else(|| {
            items
                .iter()
                .fold(Decimal::ZERO, |sum, item| sum.saturating_add(item.line_total()))
        });
        if !fits_money_column(total_price, MAX_ORDER_TOTAL) {
            return Err(OrderValidationError::TotalOutOfRange);
        }

        Ok(Self {
            id: OrderId::generate(),
            customer,
            email,
            total_price,
            items,
        })
    }
}

/// Non-negative, at most two decimal places, and no larger than `max`.
fn fits_money_column(amount: Decimal, max: Decimal) -> bool {
    amount >= Decimal::ZERO && amount <= max && amount.normalize().scale() <= MONEY_SCALE
}

impl TryFrom<OrderRequest> for NewOrder {
    type Error = OrderValidationError;

    fn try_from(request: OrderRequest) -> Result<Self, Self::Error> {
        Self::validate(request.customer, request.items, request.total_price)
    }
}

/// A recorded order request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// One product line of a recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}
