use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{ImageId, Money, OrderId, ProductId, ReviewId, UserId},
    protocol::{PaymentResult, ShippingAddress},
};

const PRODUCT_COLUMNS: &str = "id, user_id, name, image, brand, category, description, rating, num_reviews, price_cents, count_in_stock, created_at, updated_at";

const ORDER_COLUMNS: &str = "o.id, o.user_id, COALESCE(u.name, ''), COALESCE(u.email, ''), o.address, o.city, o.postal_code, o.country, o.payment_method, o.payment_id, o.payment_status, o.payment_update_time, o.payment_email_address, o.items_price_cents, o.tax_price_cents, o.shipping_price_cents, o.total_price_cents, o.is_paid, o.paid_at, o.is_delivered, o.delivered_at, o.created_at";

/// True when `err` was caused by a UNIQUE constraint, e.g. a second account
/// for the same email.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<sqlx::Error>(),
            Some(sqlx::Error::Database(db)) if db.is_unique_violation()
        )
    })
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

/// Partial user update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct StoredProduct {
    pub product_id: ProductId,
    pub owner_id: UserId,
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub rating: f64,
    pub num_reviews: u32,
    pub price: Money,
    pub count_in_stock: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProductFields {
    pub name: String,
    pub image: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: Money,
    pub count_in_stock: u32,
}

#[derive(Debug, Clone)]
pub struct StoredReview {
    pub review_id: ReviewId,
    pub product_id: ProductId,
    pub user_id: UserId,
    pub name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub qty: u32,
    pub image: String,
    pub price: Money,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
}

#[derive(Debug, Clone)]
pub struct StoredOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub qty: u32,
    pub image: String,
    pub price: Money,
}

#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: String,
    pub items: Vec<StoredOrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_result: Option<PaymentResult>,
    pub items_price: Money,
    pub tax_price: Money,
    pub shipping_price: Money,
    pub total_price: Money,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub image_id: ImageId,
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    // ---- users -------------------------------------------------------------

    pub async fn create_user(&self, user: &NewUser<'_>) -> Result<UserId> {
        let rec = sqlx::query(
            "INSERT INTO users (name, email, password_hash, is_admin) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed to insert user '{}'", user.email))?;
        Ok(UserId(rec.get::<i64, _>(0)))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<StoredUser>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn load_user(&self, user_id: UserId) -> Result<Option<StoredUser>> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users WHERE id = ?",
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| user_from_row(&r)))
    }

    pub async fn list_users(&self) -> Result<Vec<StoredUser>> {
        let rows = sqlx::query(
            "SELECT id, name, email, password_hash, is_admin, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(user_from_row).collect())
    }

    pub async fn update_user(&self, user_id: UserId, changes: &UserChanges) -> Result<bool> {
        let affected = sqlx::query(
            "UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                is_admin = COALESCE(?, is_admin),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .bind(changes.is_admin)
        .bind(user_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    pub async fn delete_user(&self, user_id: UserId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    // ---- products ----------------------------------------------------------

    pub async fn list_products(
        &self,
        keyword: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<StoredProduct>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)
             ORDER BY id ASC
             LIMIT ? OFFSET ?"
        );
        let rows = sqlx::query(&sql)
            .bind(keyword)
            .bind(keyword)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(product_from_row).collect())
    }

    pub async fn count_products(&self, keyword: Option<&str>) -> Result<u32> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE (? IS NULL OR instr(lower(name), lower(?)) > 0)",
        )
        .bind(keyword)
        .bind(keyword)
        .fetch_one(&self.pool)
        .await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    pub async fn top_products(&self, limit: u32) -> Result<Vec<StoredProduct>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY rating DESC, num_reviews DESC, id ASC LIMIT ?"
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(product_from_row).collect())
    }

    pub async fn load_product(&self, product_id: ProductId) -> Result<Option<StoredProduct>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(product_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(product_from_row))
    }

    pub async fn create_product(&self, owner_id: UserId, fields: &ProductFields) -> Result<ProductId> {
        let rec = sqlx::query(
            "INSERT INTO products (user_id, name, image, brand, category, description, price_cents, count_in_stock)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(owner_id.0)
        .bind(&fields.name)
        .bind(&fields.image)
        .bind(&fields.brand)
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(fields.price.cents())
        .bind(fields.count_in_stock)
        .fetch_one(&self.pool)
        .await?;
        Ok(ProductId(rec.get::<i64, _>(0)))
    }

    pub async fn update_product(&self, product_id: ProductId, fields: &ProductFields) -> Result<bool> {
        let affected = sqlx::query(
            "UPDATE products SET
                name = ?, image = ?, brand = ?, category = ?, description = ?,
                price_cents = ?, count_in_stock = ?, updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(&fields.name)
        .bind(&fields.image)
        .bind(&fields.brand)
        .bind(&fields.category)
        .bind(&fields.description)
        .bind(fields.price.cents())
        .bind(fields.count_in_stock)
        .bind(product_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    pub async fn delete_product(&self, product_id: ProductId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id.0)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    // ---- reviews -----------------------------------------------------------

    pub async fn list_reviews(&self, product_id: ProductId) -> Result<Vec<StoredReview>> {
        let rows = sqlx::query(
            "SELECT id, product_id, user_id, name, rating, comment, created_at
             FROM reviews WHERE product_id = ? ORDER BY id ASC",
        )
        .bind(product_id.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| StoredReview {
                review_id: ReviewId(r.get::<i64, _>(0)),
                product_id: ProductId(r.get::<i64, _>(1)),
                user_id: UserId(r.get::<i64, _>(2)),
                name: r.get::<String, _>(3),
                rating: u8::try_from(r.get::<i64, _>(4)).unwrap_or_default(),
                comment: r.get::<String, _>(5),
                created_at: r.get::<DateTime<Utc>, _>(6),
            })
            .collect())
    }

    pub async fn has_reviewed(&self, product_id: ProductId, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM reviews WHERE product_id = ? AND user_id = ?")
            .bind(product_id.0)
            .bind(user_id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Inserts a review and refreshes the product's rating and review count in
    /// the same transaction. Returns `None` when the user already reviewed the
    /// product.
    pub async fn add_review(
        &self,
        product_id: ProductId,
        user_id: UserId,
        name: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Option<ReviewId>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO reviews (product_id, user_id, name, rating, comment) VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(product_id.0)
        .bind(user_id.0)
        .bind(name)
        .bind(i64::from(rating))
        .bind(comment)
        .fetch_one(&mut *tx)
        .await;
        let rec = match inserted {
            Ok(rec) => rec,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => return Ok(None),
            Err(e) => return Err(anyhow::Error::new(e).context("failed to insert review")),
        };
        let review_id = ReviewId(rec.get::<i64, _>(0));

        sqlx::query(
            "UPDATE products SET
                num_reviews = (SELECT COUNT(*) FROM reviews WHERE product_id = ?),
                rating = COALESCE((SELECT AVG(rating) FROM reviews WHERE product_id = ?), 0),
                updated_at = CURRENT_TIMESTAMP
             WHERE id = ?",
        )
        .bind(product_id.0)
        .bind(product_id.0)
        .bind(product_id.0)
        .execute(&mut *tx)
        .await
        .context("failed to refresh product rating")?;

        tx.commit().await?;
        Ok(Some(review_id))
    }

    // ---- orders ------------------------------------------------------------

    pub async fn create_order(&self, order: &NewOrder) -> Result<OrderId> {
        let mut tx = self.pool.begin().await?;

        let rec = sqlx::query(
            "INSERT INTO orders (user_id, address, city, postal_code, country, payment_method,
                                 items_price_cents, tax_price_cents, shipping_price_cents, total_price_cents)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(order.user_id.0)
        .bind(&order.shipping_address.address)
        .bind(&order.shipping_address.city)
        .bind(&order.shipping_address.postal_code)
        .bind(&order.shipping_address.country)
        .bind(&order.payment_method)
        .bind(order.items_price.cents())
        .bind(order.tax_price.cents())
        .bind(order.shipping_price.cents())
        .bind(order.total_price.cents())
        .fetch_one(&mut *tx)
        .await
        .context("failed to insert order")?;
        let order_id = OrderId(rec.get::<i64, _>(0));

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, name, qty, image, price_cents) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(order_id.0)
            .bind(item.product_id.0)
            .bind(&item.name)
            .bind(item.qty)
            .bind(&item.image)
            .bind(item.price.cents())
            .execute(&mut *tx)
            .await
            .context("failed to insert order item")?;
        }

        tx.commit().await?;
        Ok(order_id)
    }

    pub async fn load_order(&self, order_id: OrderId) -> Result<Option<StoredOrder>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id WHERE o.id = ?"
        );
        let row = sqlx::query(&sql)
            .bind(order_id.0)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut order = order_from_row(&row);
        order.items = self.load_order_items(order.order_id).await?;
        Ok(Some(order))
    }

    pub async fn list_orders_for_user(&self, user_id: UserId) -> Result<Vec<StoredOrder>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id
             WHERE o.user_id = ? ORDER BY o.id DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(user_id.0)
            .fetch_all(&self.pool)
            .await?;
        self.orders_with_items(rows).await
    }

    pub async fn list_all_orders(&self) -> Result<Vec<StoredOrder>> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM orders o LEFT JOIN users u ON u.id = o.user_id ORDER BY o.id DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        self.orders_with_items(rows).await
    }

    /// Flips an unpaid order to paid. Returns false when the order is missing
    /// or was already paid, leaving the first payment result in place.
    pub async fn mark_order_paid(
        &self,
        order_id: OrderId,
        payment: Option<&PaymentResult>,
        paid_at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = sqlx::query(
            "UPDATE orders SET
                is_paid = 1, paid_at = ?,
                payment_id = ?, payment_status = ?, payment_update_time = ?, payment_email_address = ?
             WHERE id = ? AND is_paid = 0",
        )
        .bind(paid_at)
        .bind(payment.map(|p| p.id.as_str()))
        .bind(payment.map(|p| p.status.as_str()))
        .bind(payment.map(|p| p.update_time.as_str()))
        .bind(payment.map(|p| p.email_address.as_str()))
        .bind(order_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    /// Only paid, undelivered orders move to delivered.
    pub async fn mark_order_delivered(
        &self,
        order_id: OrderId,
        delivered_at: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = sqlx::query(
            "UPDATE orders SET is_delivered = 1, delivered_at = ?
             WHERE id = ? AND is_paid = 1 AND is_delivered = 0",
        )
        .bind(delivered_at)
        .bind(order_id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    async fn orders_with_items(&self, rows: Vec<SqliteRow>) -> Result<Vec<StoredOrder>> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let mut order = order_from_row(&row);
            order.items = self.load_order_items(order.order_id).await?;
            orders.push(order);
        }
        Ok(orders)
    }

    async fn load_order_items(&self, order_id: OrderId) -> Result<Vec<StoredOrderItem>> {
        let rows = sqlx::query(
            "SELECT product_id, name, qty, image, price_cents FROM order_items WHERE order_id = ? ORDER BY id ASC",
        )
        .bind(order_id.0)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| StoredOrderItem {
                product_id: ProductId(r.get::<i64, _>(0)),
                name: r.get::<String, _>(1),
                qty: u32::try_from(r.get::<i64, _>(2)).unwrap_or_default(),
                image: r.get::<String, _>(3),
                price: Money(r.get::<i64, _>(4)),
            })
            .collect())
    }

    // ---- images ------------------------------------------------------------

    pub async fn store_image(
        &self,
        uploader_id: UserId,
        name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<ImageId> {
        let size_bytes = i64::try_from(bytes.len()).unwrap_or(i64::MAX);
        let rec = sqlx::query(
            "INSERT INTO images (uploader_user_id, name, mime_type, bytes, size_bytes) VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(uploader_id.0)
        .bind(name)
        .bind(mime_type)
        .bind(bytes)
        .bind(size_bytes)
        .fetch_one(&self.pool)
        .await?;
        Ok(ImageId(rec.get::<i64, _>(0)))
    }

    pub async fn load_image(&self, name: &str) -> Result<Option<StoredImage>> {
        let row = sqlx::query("SELECT id, name, mime_type, bytes, size_bytes FROM images WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| StoredImage {
            image_id: ImageId(r.get::<i64, _>(0)),
            name: r.get::<String, _>(1),
            mime_type: r.get::<String, _>(2),
            bytes: r.get::<Vec<u8>, _>(3),
            size_bytes: u64::try_from(r.get::<i64, _>(4)).unwrap_or_default(),
        }))
    }

    /// Removes every order, review, product and user. Uploaded images are kept.
    pub async fn destroy_all_data(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["order_items", "orders", "reviews", "products", "users"] {
            let removed = sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to clear table {table}"))?
                .rows_affected();
            tracing::debug!(table, removed, "cleared table");
        }
        tx.commit().await?;
        Ok(())
    }
}

fn user_from_row(r: &SqliteRow) -> StoredUser {
    StoredUser {
        user_id: UserId(r.get::<i64, _>(0)),
        name: r.get::<String, _>(1),
        email: r.get::<String, _>(2),
        password_hash: r.get::<String, _>(3),
        is_admin: r.get::<bool, _>(4),
        created_at: r.get::<DateTime<Utc>, _>(5),
    }
}

fn product_from_row(r: &SqliteRow) -> StoredProduct {
    StoredProduct {
        product_id: ProductId(r.get::<i64, _>(0)),
        owner_id: UserId(r.get::<i64, _>(1)),
        name: r.get::<String, _>(2),
        image: r.get::<String, _>(3),
        brand: r.get::<String, _>(4),
        category: r.get::<String, _>(5),
        description: r.get::<String, _>(6),
        rating: r.get::<f64, _>(7),
        num_reviews: u32::try_from(r.get::<i64, _>(8)).unwrap_or_default(),
        price: Money(r.get::<i64, _>(9)),
        count_in_stock: u32::try_from(r.get::<i64, _>(10)).unwrap_or_default(),
        created_at: r.get::<DateTime<Utc>, _>(11),
        updated_at: r.get::<DateTime<Utc>, _>(12),
    }
}

fn order_from_row(r: &SqliteRow) -> StoredOrder {
    let payment_id = r.get::<Option<String>, _>(9);
    let payment_result = payment_id.map(|id| PaymentResult {
        id,
        status: r.get::<Option<String>, _>(10).unwrap_or_default(),
        update_time: r.get::<Option<String>, _>(11).unwrap_or_default(),
        email_address: r.get::<Option<String>, _>(12).unwrap_or_default(),
    });

    StoredOrder {
        order_id: OrderId(r.get::<i64, _>(0)),
        user_id: UserId(r.get::<i64, _>(1)),
        user_name: r.get::<String, _>(2),
        user_email: r.get::<String, _>(3),
        items: Vec::new(),
        shipping_address: ShippingAddress {
            address: r.get::<String, _>(4),
            city: r.get::<String, _>(5),
            postal_code: r.get::<String, _>(6),
            country: r.get::<String, _>(7),
        },
        payment_method: r.get::<String, _>(8),
        payment_result,
        items_price: Money(r.get::<i64, _>(13)),
        tax_price: Money(r.get::<i64, _>(14)),
        shipping_price: Money(r.get::<i64, _>(15)),
        total_price: Money(r.get::<i64, _>(16)),
        is_paid: r.get::<bool, _>(17),
        paid_at: r.get::<Option<DateTime<Utc>>, _>(18),
        is_delivered: r.get::<bool, _>(19),
        delivered_at: r.get::<Option<DateTime<Utc>>, _>(20),
        created_at: r.get::<DateTime<Utc>, _>(21),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
