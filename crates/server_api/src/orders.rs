use chrono::Utc;
use shared::{
    domain::{Count, OrderId},
    error::ApiError,
    pricing::calc_prices,
    protocol::{CreateOrderRequest, Order, OrderItem, OrderUser, PaymentResult, UserProfile},
};
use storage::{NewOrder, NewOrderItem, StoredOrder};
use tracing::info;

use crate::{internal, products, ApiContext};

const ORDER_NOT_FOUND: &str = "Order not found";
const ORDER_ALREADY_PAID: &str = "Order already paid";
const ORDER_ALREADY_DELIVERED: &str = "Order already delivered";

fn to_order(order: StoredOrder) -> Order {
    Order {
        id: order.order_id,
        user: OrderUser {
            id: order.user_id,
            name: order.user_name,
            email: order.user_email,
        },
        order_items: order
            .items
            .into_iter()
            .map(|item| OrderItem {
                name: item.name,
                qty: Count(item.qty),
                image: item.image,
                price: item.price,
                product: item.product_id,
            })
            .collect(),
        shipping_address: order.shipping_address,
        payment_method: order.payment_method,
        payment_result: order.payment_result,
        items_price: order.items_price,
        tax_price: order.tax_price,
        shipping_price: order.shipping_price,
        total_price: order.total_price,
        is_paid: order.is_paid,
        paid_at: order.paid_at,
        is_delivered: order.is_delivered,
        delivered_at: order.delivered_at,
        created_at: order.created_at,
    }
}

async fn load(ctx: &ApiContext, order_id: OrderId) -> Result<StoredOrder, ApiError> {
    ctx.storage
        .load_order(order_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(ORDER_NOT_FOUND))
}

/// Loads an order the viewer is allowed to see: their own, or any for admins.
async fn load_visible(
    ctx: &ApiContext,
    viewer: &UserProfile,
    order_id: OrderId,
) -> Result<StoredOrder, ApiError> {
    let order = load(ctx, order_id).await?;
    if order.user_id != viewer.id && !viewer.is_admin {
        return Err(ApiError::forbidden("Not authorized to view this order"));
    }
    Ok(order)
}

fn zero_quantity(name: &str) -> ApiError {
    ApiError::validation(format!("Quantity for {name} must be at least 1"))
}

/// Creates an order from the buyer's cart. Names, images and unit prices come
/// from the catalogue, never from the request.
pub async fn add_order_items(
    ctx: &ApiContext,
    buyer: &UserProfile,
    req: &CreateOrderRequest,
) -> Result<Order, ApiError> {
    if req.order_items.is_empty() {
        return Err(ApiError::validation("No order items"));
    }
    let payment_method = req.payment_method.trim();
    if payment_method.is_empty() {
        return Err(ApiError::validation("Payment method is required"));
    }
    let address = &req.shipping_address;
    if [&address.address, &address.city, &address.postal_code, &address.country]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(ApiError::validation("Shipping address is incomplete"));
    }

    // Lines for the same product are merged so stock is checked against the
    // total quantity ordered.
    let mut lines: Vec<(NewOrderItem, u32)> = Vec::with_capacity(req.order_items.len());
    for line in &req.order_items {
        let qty = line.qty.0;
        if let Some((item, _)) = lines
            .iter_mut()
            .find(|(item, _)| item.product_id == line.product)
        {
            if qty == 0 {
                return Err(zero_quantity(&item.name));
            }
            item.qty = item.qty.saturating_add(qty);
            continue;
        }
        let product = products::load(ctx, line.product).await?;
        if qty == 0 {
            return Err(zero_quantity(&product.name));
        }
        lines.push((
            NewOrderItem {
                product_id: product.product_id,
                name: product.name,
                qty,
                image: product.image,
                price: product.price,
            },
            product.count_in_stock,
        ));
    }

    let mut items = Vec::with_capacity(lines.len());
    for (item, in_stock) in lines {
        if item.qty > in_stock {
            return Err(ApiError::validation(format!(
                "Only {in_stock} of {} left in stock",
                item.name
            )));
        }
        items.push(item);
    }

    let prices = calc_prices(items.iter().map(|item| (item.price, item.qty)));
    let order_id = ctx
        .storage
        .create_order(&NewOrder {
            user_id: buyer.id,
            items,
            shipping_address: req.shipping_address.clone(),
            payment_method: payment_method.to_string(),
            items_price: prices.items_price,
            tax_price: prices.tax_price,
            shipping_price: prices.shipping_price,
            total_price: prices.total_price,
        })
        .await
        .map_err(internal)?;
    info!(
        order_id = order_id.0,
        user_id = buyer.id.0,
        total = %prices.total_price,
        "created order"
    );

    load(ctx, order_id).await.map(to_order)
}

pub async fn get_my_orders(ctx: &ApiContext, buyer: &UserProfile) -> Result<Vec<Order>, ApiError> {
    let orders = ctx
        .storage
        .list_orders_for_user(buyer.id)
        .await
        .map_err(internal)?;
    Ok(orders.into_iter().map(to_order).collect())
}

pub async fn get_order_by_id(
    ctx: &ApiContext,
    viewer: &UserProfile,
    order_id: OrderId,
) -> Result<Order, ApiError> {
    load_visible(ctx, viewer, order_id).await.map(to_order)
}

pub async fn update_order_to_paid(
    ctx: &ApiContext,
    viewer: &UserProfile,
    order_id: OrderId,
    payment: Option<&PaymentResult>,
) -> Result<Order, ApiError> {
    let order = load_visible(ctx, viewer, order_id).await?;
    if order.is_paid {
        return Err(ApiError::validation(ORDER_ALREADY_PAID));
    }

    // A capture without an id carries nothing worth recording.
    let payment = payment.filter(|p| !p.id.trim().is_empty());
    let updated = ctx
        .storage
        .mark_order_paid(order_id, payment, Utc::now())
        .await
        .map_err(internal)?;
    if !updated {
        // Another request paid the order after it was loaded.
        return Err(ApiError::validation(ORDER_ALREADY_PAID));
    }
    info!(
        order_id = order_id.0,
        payment_id = payment.map(|p| p.id.as_str()).unwrap_or_default(),
        "order paid"
    );
    load(ctx, order_id).await.map(to_order)
}

pub async fn update_order_to_delivered(
    ctx: &ApiContext,
    order_id: OrderId,
) -> Result<Order, ApiError> {
    let order = load(ctx, order_id).await?;
    if !order.is_paid {
        return Err(ApiError::validation("Order has not been paid"));
    }
    if order.is_delivered {
        return Err(ApiError::validation(ORDER_ALREADY_DELIVERED));
    }

    let updated = ctx
        .storage
        .mark_order_delivered(order_id, Utc::now())
        .await
        .map_err(internal)?;
    if !updated {
        return Err(ApiError::validation(ORDER_ALREADY_DELIVERED));
    }
    info!(order_id = order_id.0, "order delivered");
    load(ctx, order_id).await.map(to_order)
}

pub async fn get_orders(ctx: &ApiContext) -> Result<Vec<Order>, ApiError> {
    let orders = ctx.storage.list_all_orders().await.map_err(internal)?;
    Ok(orders.into_iter().map(to_order).collect())
}
