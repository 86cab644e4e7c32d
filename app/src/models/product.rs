// fastcart/app/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Largest value a `NUMERIC(12, 2)` price column holds.
pub const PRICE_MAX: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2); // 9_999_999_999.99

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub description: Option<String>, // Description can be optional
  pub price: Decimal,
  pub stock: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Public listing fields.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductSummary {
  pub id: i64,
  pub name: String,
  pub price: Decimal,
  pub stock: i32,
}

/// Body of `POST /api/v1/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductCreate {
  pub name: String,
  #[serde(default)]
  pub description: Option<String>,
  pub price: Decimal,
  pub stock: i32,
}

impl ProductCreate {
  /// Trims text fields; a blank description becomes `None`.
  pub fn normalized(self) -> Self {
    let description = self
      .description
      .map(|d| d.trim().to_string())
      .filter(|d| !d.is_empty());
    Self {
      name: self.name.trim().to_string(),
      description,
      price: self.price,
      stock: self.stock,
    }
  }

  /// Collects every field problem so the client sees them together.
  pub fn validate(&self) -> Result<(), Vec<String>> {
    let mut details = Vec::new();

    let name_chars = self.name.chars().count();
    if name_chars < NAME_MIN_CHARS {
      details.push(format!("name: must be at least {} characters", NAME_MIN_CHARS));
    } else if name_chars > NAME_MAX_CHARS {
      details.push(format!("name: must be at most {} characters", NAME_MAX_CHARS));
    }

    if let Some(description) = &self.description {
      if description.chars().count() > DESCRIPTION_MAX_CHARS {
        details.push(format!(
          "description: must be at most {} characters",
          DESCRIPTION_MAX_CHARS
        ));
      }
    }

    if self.price <= Decimal::ZERO {
      details.push("price: must be greater than 0".to_string());
    } else if self.price.normalize().scale() > 2 {
      details.push("price: must have at most 2 decimal places".to_string());
    } else if self.price > PRICE_MAX {
      details.push(format!("price: must be at most {}", PRICE_MAX));
    }

    if self.stock < 0 {
      details.push("stock: must be greater than or equal to 0".to_string());
    }

    if details.is_empty() {
      Ok(())
    } else {
      Err(details)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn payload(name: &str, price: Decimal, stock: i32) -> ProductCreate {
    ProductCreate {
      name: name.to_string(),
      description: None,
      price,
      stock,
    }
  }

  #[test]
  fn valid_payload_passes() {
    assert!(payload("Desk Lamp", dec!(19.99), 5).validate().is_ok());
    assert!(payload("Gift", dec!(1.50), 0).validate().is_ok());
  }

  #[test]
  fn name_is_checked_after_trimming() {
    let p = payload("  ab  ", dec!(10), 1).normalized();
    assert_eq!(p.name, "ab");
    assert_eq!(
      p.validate().unwrap_err(),
      vec!["name: must be at least 3 characters".to_string()]
    );
  }

  #[test]
  fn blank_description_is_dropped() {
    let mut p = payload("Chair", dec!(10), 1);
    p.description = Some("   ".to_string());
    assert_eq!(p.normalized().description, None);
  }

  #[test]
  fn all_problems_are_reported_together() {
    let mut p = payload("x", dec!(0), -1);
    p.description = Some("d".repeat(DESCRIPTION_MAX_CHARS + 1));
    let details = p.validate().unwrap_err();
    assert_eq!(details.len(), 4);
    assert!(details.iter().any(|d| d.starts_with("price:")));
    assert!(details.iter().any(|d| d.starts_with("stock:")));
  }

  #[test]
  fn prices_beyond_the_column_are_rejected() {
    assert_eq!(PRICE_MAX, dec!(9999999999.99));
    assert!(payload("Yacht", dec!(9999999999.99), 1).validate().is_ok());
    let details = payload("Yacht", dec!(10000000000.00), 1).validate().unwrap_err();
    assert_eq!(details, vec!["price: must be at most 9999999999.99".to_string()]);
  }

  #[test]
  fn sub_cent_prices_are_rejected() {
    let details = payload("Screws", dec!(0.001), 1).validate().unwrap_err();
    assert_eq!(details, vec!["price: must have at most 2 decimal places".to_string()]);
    // Trailing zeros are fine.
    assert!(payload("Screws", dec!(2.500), 1).validate().is_ok());
  }
}
