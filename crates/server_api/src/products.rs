use shared::{
    domain::{Count, Money, ProductId},
    error::ApiError,
    protocol::{MessageResponse, Product, ProductPage, ProductUpdateRequest, Review, ReviewRequest, UserProfile},
};
use storage::{ProductFields, StoredProduct, StoredReview};
use tracing::info;

use crate::{internal, ApiContext, RESOURCE_NOT_FOUND};

const TOP_PRODUCTS: u32 = 3;
const ALREADY_REVIEWED: &str = "Product already reviewed";

fn to_review(review: StoredReview) -> Review {
    Review {
        id: review.review_id,
        user: review.user_id,
        name: review.name,
        rating: review.rating,
        comment: review.comment,
        created_at: review.created_at,
    }
}

fn to_product(product: StoredProduct, reviews: Vec<Review>) -> Product {
    Product {
        id: product.product_id,
        user: product.owner_id,
        name: product.name,
        image: product.image,
        brand: product.brand,
        category: product.category,
        description: product.description,
        reviews,
        rating: product.rating,
        num_reviews: product.num_reviews,
        price: product.price,
        count_in_stock: Count(product.count_in_stock),
        created_at: product.created_at,
        updated_at: product.updated_at,
    }
}

fn sample_fields() -> ProductFields {
    ProductFields {
        name: "Sample name".into(),
        image: "/images/sample.jpg".into(),
        brand: "Sample brand".into(),
        category: "Sample category".into(),
        description: "Sample description".into(),
        price: Money::ZERO,
        count_in_stock: 0,
    }
}

pub(crate) async fn load(ctx: &ApiContext, product_id: ProductId) -> Result<StoredProduct, ApiError> {
    ctx.storage
        .load_product(product_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(RESOURCE_NOT_FOUND))
}

/// One page of the catalogue, optionally filtered by a case-insensitive
/// name keyword. Pages are 1-based; anything below 1 means the first page.
pub async fn list_products(
    ctx: &ApiContext,
    keyword: Option<&str>,
    page: Option<u32>,
) -> Result<ProductPage, ApiError> {
    let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
    let page = page.unwrap_or(1).max(1);
    let page_size = ctx.page_size.max(1);

    let count = ctx
        .storage
        .count_products(keyword)
        .await
        .map_err(internal)?;
    let offset = (page - 1).saturating_mul(page_size);
    let products = ctx
        .storage
        .list_products(keyword, page_size, offset)
        .await
        .map_err(internal)?;

    Ok(ProductPage {
        products: products
            .into_iter()
            .map(|p| to_product(p, Vec::new()))
            .collect(),
        page,
        pages: count.div_ceil(page_size),
    })
}

pub async fn get_product(ctx: &ApiContext, product_id: ProductId) -> Result<Product, ApiError> {
    let product = load(ctx, product_id).await?;
    let reviews = ctx
        .storage
        .list_reviews(product_id)
        .await
        .map_err(internal)?;
    Ok(to_product(
        product,
        reviews.into_iter().map(to_review).collect(),
    ))
}

/// Creates a placeholder product for the admin to edit afterwards.
pub async fn create_product(ctx: &ApiContext, owner: &UserProfile) -> Result<Product, ApiError> {
    let product_id = ctx
        .storage
        .create_product(owner.id, &sample_fields())
        .await
        .map_err(internal)?;
    info!(product_id = product_id.0, owner = owner.id.0, "created sample product");
    get_product(ctx, product_id).await
}

pub async fn update_product(
    ctx: &ApiContext,
    product_id: ProductId,
    req: &ProductUpdateRequest,
) -> Result<Product, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Product name is required"));
    }

    let fields = ProductFields {
        name: name.to_string(),
        image: req.image.trim().to_string(),
        brand: req.brand.trim().to_string(),
        category: req.category.trim().to_string(),
        description: req.description.trim().to_string(),
        price: req.price,
        count_in_stock: req.count_in_stock.0,
    };
    let updated = ctx
        .storage
        .update_product(product_id, &fields)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(ApiError::not_found(RESOURCE_NOT_FOUND));
    }
    info!(product_id = product_id.0, "updated product");
    get_product(ctx, product_id).await
}

pub async fn delete_product(
    ctx: &ApiContext,
    product_id: ProductId,
) -> Result<MessageResponse, ApiError> {
    let deleted = ctx
        .storage
        .delete_product(product_id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(ApiError::not_found(RESOURCE_NOT_FOUND));
    }
    info!(product_id = product_id.0, "deleted product");
    Ok(MessageResponse::new("Product removed"))
}

pub async fn create_review(
    ctx: &ApiContext,
    reviewer: &UserProfile,
    product_id: ProductId,
    req: &ReviewRequest,
) -> Result<MessageResponse, ApiError> {
    let rating = u8::try_from(req.rating.0)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| ApiError::validation("Rating must be between 1 and 5"))?;

    load(ctx, product_id).await?;
    let already = ctx
        .storage
        .has_reviewed(product_id, reviewer.id)
        .await
        .map_err(internal)?;
    if already {
        return Err(ApiError::validation(ALREADY_REVIEWED));
    }

    ctx.storage
        .add_review(product_id, reviewer.id, &reviewer.name, rating, req.comment.trim())
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::validation(ALREADY_REVIEWED))?;
    Ok(MessageResponse::new("Review added"))
}

pub async fn top_products(ctx: &ApiContext) -> Result<Vec<Product>, ApiError> {
    let products = ctx
        .storage
        .top_products(TOP_PRODUCTS)
        .await
        .map_err(internal)?;
    Ok(products
        .into_iter()
        .map(|p| to_product(p, Vec::new()))
        .collect())
}
