// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in demo schema and the `default` schema lookup.

use sqlpilot_core::{SchemaStore, SqlPilotError};
use tracing::debug;

/// Name under which the fallback schema is cached.
pub const DEFAULT_SCHEMA_NAME: &str = "default";

/// E-commerce demo schema used when no other default has been stored.
pub const DEFAULT_SCHEMA: &str = "-- E-commerce Database Schema

CREATE TABLE customers (
  customer_id INT PRIMARY KEY,
  email VARCHAR(255) UNIQUE NOT NULL,
  first_name VARCHAR(100),
  last_name VARCHAR(100),
  created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE products (
  product_id INT PRIMARY KEY,
  name VARCHAR(255) NOT NULL,
  description TEXT,
  price DECIMAL(10, 2),
  stock_quantity INT DEFAULT 0,
  category VARCHAR(100)
);

CREATE TABLE orders (
  order_id INT PRIMARY KEY,
  customer_id INT REFERENCES customers(customer_id),
  order_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
  total DECIMAL(10, 2),
  status VARCHAR(50) DEFAULT 'pending'
);

CREATE TABLE order_items (
  order_item_id INT PRIMARY KEY,
  order_id INT REFERENCES orders(order_id),
  product_id INT REFERENCES products(product_id),
  quantity INT,
  price DECIMAL(10, 2)
);";

/// Cache key for a named schema.
pub fn schema_key(name: &str) -> String {
    format!("schema:{name}")
}

/// Return the cached `default` schema, seeding it on first use.
///
/// `seed` replaces the built-in schema as the seeded value; an already
/// cached default always wins.
pub async fn resolve_default_schema(
    store: &dyn SchemaStore,
    seed: Option<&str>,
) -> Result<String, SqlPilotError> {
    if let Some(cached) = store.get_schema(DEFAULT_SCHEMA_NAME).await?
        && !cached.is_empty()
    {
        return Ok(cached);
    }

    let schema = seed.unwrap_or(DEFAULT_SCHEMA).trim().to_string();
    store.put_schema(DEFAULT_SCHEMA_NAME, &schema).await?;
    debug!(len = schema.len(), "seeded default schema");
    Ok(schema)
}
