use anyhow::{Context, Result};
use shared::domain::{Money, UserId};
use storage::{NewUser, ProductFields, Storage};
use tracing::info;

pub const SEED_PASSWORD: &str = "123456";

pub struct SeedUser {
    pub name: &'static str,
    pub email: &'static str,
    pub is_admin: bool,
}

/// The first entry is the admin that owns every seeded product.
pub const USERS: &[SeedUser] = &[
    SeedUser {
        name: "Admin User",
        email: "admin@email.com",
        is_admin: true,
    },
    SeedUser {
        name: "Zoki Odinson",
        email: "zoki@email.com",
        is_admin: false,
    },
    SeedUser {
        name: "Bana Moja",
        email: "bana@email.com",
        is_admin: false,
    },
];

pub fn products() -> Vec<ProductFields> {
    let product = |name: &str, image: &str, brand: &str, description: &str, cents: i64, stock| {
        ProductFields {
            name: name.into(),
            image: image.into(),
            brand: brand.into(),
            category: "Electronics".into(),
            description: description.into(),
            price: Money(cents),
            count_in_stock: stock,
        }
    };
    vec![
        product(
            "Airpods Wireless Bluetooth Headphones",
            "/images/airpods.jpg",
            "Apple",
            "Bluetooth technology lets you connect it with compatible devices wirelessly. High-quality AAC audio offers immersive listening experience. Built-in microphone allows you to take calls while working",
            89_99,
            10,
        ),
        product(
            "iPhone 11 Pro 256GB Memory",
            "/images/phone.jpg",
            "Apple",
            "Introducing the iPhone 11 Pro. A transformative triple-camera system that adds tons of capability without complexity. An unprecedented leap in battery life",
            599_99,
            7,
        ),
        product(
            "Cannon EOS 80D DSLR Camera",
            "/images/camera.jpg",
            "Cannon",
            "Characterized by versatile imaging specs, the Canon EOS 80D further clarifies itself using a pair of robust focusing systems and an intuitive design",
            929_99,
            5,
        ),
        product(
            "Sony Playstation 4 Pro White Version",
            "/images/playstation.jpg",
            "Sony",
            "The ultimate home entertainment center starts with PlayStation. Whether you are into gaming, HD movies, television, music",
            399_99,
            11,
        ),
        product(
            "Logitech G-Series Gaming Mouse",
            "/images/mouse.jpg",
            "Logitech",
            "Get a better handle on your games with this Logitech LIGHTSYNC gaming mouse. The six programmable buttons allow customization for a smooth playing experience",
            49_99,
            7,
        ),
        product(
            "Amazon Echo Dot 3rd Generation",
            "/images/alexa.jpg",
            "Amazon",
            "Meet Echo Dot - Our most popular smart speaker with a fabric design. It is our most compact smart speaker that fits perfectly into small space",
            29_99,
            0,
        ),
    ]
}

/// Wipes orders, reviews, products and users, then inserts the seed set.
/// Returns the id of the seeded admin.
pub async fn import(storage: &Storage) -> Result<UserId> {
    storage
        .destroy_all_data()
        .await
        .context("failed to clear existing data")?;

    let password_hash = auth::hash_password(SEED_PASSWORD)?;
    let mut admin = None;
    for user in USERS {
        let user_id = storage
            .create_user(&NewUser {
                name: user.name,
                email: user.email,
                password_hash: &password_hash,
                is_admin: user.is_admin,
            })
            .await
            .with_context(|| format!("failed to seed user {}", user.email))?;
        if user.is_admin && admin.is_none() {
            admin = Some(user_id);
        }
    }
    let admin = admin.context("seed set has no admin user")?;

    let catalogue = products();
    for fields in &catalogue {
        storage
            .create_product(admin, fields)
            .await
            .with_context(|| format!("failed to seed product {}", fields.name))?;
    }
    info!(
        users = USERS.len(),
        products = catalogue.len(),
        "seed data imported"
    );
    Ok(admin)
}

pub async fn create_admin(
    storage: &Storage,
    name: &str,
    email: &str,
    password: &str,
) -> Result<UserId> {
    let email = email.trim().to_lowercase();
    if !email.contains('@') {
        anyhow::bail!("'{email}' is not an email address");
    }
    if storage.find_user_by_email(&email).await?.is_some() {
        anyhow::bail!("a user with email {email} already exists");
    }
    let password_hash = auth::hash_password(password)?;
    let user_id = storage
        .create_user(&NewUser {
            name: name.trim(),
            email: &email,
            password_hash: &password_hash,
            is_admin: true,
        })
        .await?;
    info!(user_id = user_id.0, %email, "admin user created");
    Ok(user_id)
}

#[cfg(test)]
#[path = "tests/seed_tests.rs"]
mod tests;
