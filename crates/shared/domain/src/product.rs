//! Listing entity and its moderation lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    LISTING_TYPE_PRODUCT, LISTING_TYPE_SERVICE, MAX_DISCOUNT_PERCENT, MAX_PRICE,
    MIN_DISCOUNT_PERCENT, STATUS_APPROVED, STATUS_PENDING, STATUS_REJECTED,
};
use crate::error::{DomainError, DomainResult};
use crate::messages;
use crate::order::ProductSnapshot;

/// Moderation status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ProductStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProductStatus {
    /// Pending and approved listings count against the standard quota.
    pub fn is_active(&self) -> bool {
        matches!(self, ProductStatus::Pending | ProductStatus::Approved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Pending => STATUS_PENDING,
            ProductStatus::Approved => STATUS_APPROVED,
            ProductStatus::Rejected => STATUS_REJECTED,
        }
    }
}

impl From<&str> for ProductStatus {
    fn from(s: &str) -> Self {
        match s {
            STATUS_APPROVED => ProductStatus::Approved,
            STATUS_REJECTED => ProductStatus::Rejected,
            _ => ProductStatus::Pending,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical good or transport/logistics offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum ListingType {
    #[default]
    Product,
    Service,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Product => LISTING_TYPE_PRODUCT,
            ListingType::Service => LISTING_TYPE_SERVICE,
        }
    }
}

impl From<&str> for ListingType {
    fn from(s: &str) -> Self {
        match s {
            LISTING_TYPE_SERVICE => ListingType::Service,
            _ => ListingType::Product,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Condition {
    New,
    Used,
    Refurbished,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Condition::New),
            "used" => Some(Condition::Used),
            "refurbished" => Some(Condition::Refurbished),
            _ => None,
        }
    }
}

/// Route, date and pricing of a service listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ServiceDetails {
    pub departure: String,
    pub arrival: String,
    pub departure_date: Option<NaiveDate>,
    /// FCFA per kilogram
    pub price_per_kg: Option<i64>,
    pub available_weight_kg: Option<i32>,
}

impl ServiceDetails {
    fn has_route(&self) -> bool {
        !self.departure.trim().is_empty() && !self.arrival.trim().is_empty()
    }
}

/// Listing entity, exclusively owned by `seller_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    /// Listed price in FCFA
    pub price: i64,
    pub images: Vec<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub location: String,
    pub condition: Option<Condition>,
    pub listing_type: ListingType,
    pub service_details: Option<ServiceDetails>,
    pub stock_quantity: Option<i32>,
    pub is_out_of_stock: bool,
    pub has_discount: bool,
    pub discount_percent: Option<i32>,
    pub original_price: Option<i64>,
    pub status: ProductStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a listing from a submission. Status always starts at pending,
    /// whoever submits it.
    pub fn submit(id: Uuid, seller_id: Uuid, input: NewProduct) -> Self {
        let now = Utc::now();
        let discount_percent = input.discount_percent.filter(|_| input.has_discount);
        Self {
            id,
            seller_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            price: input.price,
            images: input.images,
            category: input.category.trim().to_string(),
            sub_category: input.sub_category,
            location: input.location.trim().to_string(),
            condition: input.condition,
            listing_type: input.listing_type,
            service_details: input.service_details,
            stock_quantity: input.stock_quantity,
            is_out_of_stock: input.stock_quantity == Some(0),
            has_discount: discount_percent.is_some(),
            discount_percent,
            original_price: discount_percent.map(|_| input.price),
            status: ProductStatus::Pending,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.status == ProductStatus::Approved
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.seller_id == user_id
    }

    /// Unit price a buyer pays right now, discount included.
    pub fn effective_price(&self) -> i64 {
        match (self.has_discount, self.discount_percent) {
            (true, Some(percent)) if percent > 0 => {
                let discounted = i128::from(self.price) * i128::from(100 - percent) / 100;
                i64::try_from(discounted).unwrap_or(self.price)
            }
            _ => self.price,
        }
    }

    /// Whether the listing can currently be bought.
    pub fn is_available(&self) -> bool {
        !self.is_out_of_stock && self.stock_quantity.map_or(true, |stock| stock > 0)
    }

    /// Frozen copy used in carts and order items.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            seller_id: self.seller_id,
            title: self.title.clone(),
            image: self.images.first().cloned(),
            listing_type: self.listing_type,
            unit_price: self.effective_price(),
        }
    }

    /// Admin approval. Allowed from any status; re-approving a rejected
    /// listing overwrites the rejection.
    pub fn approve(&mut self, admin_id: Uuid) {
        let now = Utc::now();
        self.status = ProductStatus::Approved;
        self.approved_at = Some(now);
        self.approved_by = Some(admin_id);
        self.rejected_at = None;
        self.rejection_reason = None;
        self.updated_at = now;
    }

    /// Admin rejection. A blank reason falls back to the default message.
    ///
    /// Returns the stored reason.
    pub fn reject(&mut self, reason: &str) -> DomainResult<String> {
        if self.status == ProductStatus::Approved {
            return Err(DomainError::illegal_transition(
                "Une annonce approuvée ne peut pas être rejetée",
            ));
        }

        let reason = match reason.trim() {
            "" => messages::DEFAULT_REJECTION_REASON.to_string(),
            trimmed => trimmed.to_string(),
        };
        let now = Utc::now();
        self.status = ProductStatus::Rejected;
        self.rejected_at = Some(now);
        self.rejection_reason = Some(reason.clone());
        self.updated_at = now;
        Ok(reason)
    }

    /// Apply an owner edit. Status is left untouched.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(sub_category) = patch.sub_category {
            self.sub_category = Some(sub_category);
        }
        if let Some(location) = patch.location {
            self.location = location.trim().to_string();
        }
        if let Some(condition) = patch.condition {
            self.condition = Some(condition);
        }
        if let Some(details) = patch.service_details {
            self.service_details = Some(details);
        }
        if let Some(stock) = patch.stock_quantity {
            self.stock_quantity = Some(stock);
            self.is_out_of_stock = stock == 0;
        }
        if let Some(out_of_stock) = patch.is_out_of_stock {
            self.is_out_of_stock = out_of_stock;
        }
        match patch.has_discount {
            Some(true) => {
                self.has_discount = true;
                if let Some(percent) = patch.discount_percent {
                    self.discount_percent = Some(percent);
                }
            }
            Some(false) => {
                self.has_discount = false;
                self.discount_percent = None;
            }
            None => {
                if self.has_discount {
                    if let Some(percent) = patch.discount_percent {
                        self.discount_percent = Some(percent);
                    }
                }
            }
        }
        self.original_price = self.has_discount.then_some(self.price);
        self.updated_at = Utc::now();
    }

    /// Case-insensitive substring match over title, description and location.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.location.to_lowercase().contains(&needle)
    }
}

/// Listing submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    pub sub_category: Option<String>,
    pub location: String,
    pub condition: Option<Condition>,
    #[serde(default)]
    pub listing_type: ListingType,
    pub service_details: Option<ServiceDetails>,
    pub stock_quantity: Option<i32>,
    #[serde(default)]
    pub has_discount: bool,
    pub discount_percent: Option<i32>,
}

impl NewProduct {
    /// Check required fields. Runs before any store call.
    pub fn validate(&self) -> DomainResult<()> {
        require_text(&self.title, messages::TITLE_REQUIRED)?;
        require_text(&self.description, messages::DESCRIPTION_REQUIRED)?;
        validate_price(self.price)?;
        require_text(&self.location, messages::LOCATION_REQUIRED)?;
        require_text(&self.category, messages::CATEGORY_REQUIRED)?;
        validate_images(&self.images)?;

        match self.listing_type {
            ListingType::Product if self.condition.is_none() => {
                return Err(DomainError::validation(messages::CONDITION_REQUIRED));
            }
            ListingType::Service
                if !self.service_details.as_ref().is_some_and(ServiceDetails::has_route) =>
            {
                return Err(DomainError::validation(messages::SERVICE_ROUTE_REQUIRED));
            }
            _ => {}
        }

        validate_stock(self.stock_quantity)?;
        if self.has_discount {
            validate_discount(self.discount_percent)?;
        }
        Ok(())
    }

    /// Whether the submission uses any premium-only field.
    pub fn uses_stock(&self) -> bool {
        self.stock_quantity.is_some()
    }

    pub fn uses_discount(&self) -> bool {
        self.has_discount
    }
}

/// Owner edit. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub images: Option<Vec<String>>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub location: Option<String>,
    pub condition: Option<Condition>,
    pub service_details: Option<ServiceDetails>,
    pub stock_quantity: Option<i32>,
    pub is_out_of_stock: Option<bool>,
    pub has_discount: Option<bool>,
    pub discount_percent: Option<i32>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(title) = &self.title {
            require_text(title, messages::TITLE_REQUIRED)?;
        }
        if let Some(description) = &self.description {
            require_text(description, messages::DESCRIPTION_REQUIRED)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(location) = &self.location {
            require_text(location, messages::LOCATION_REQUIRED)?;
        }
        if let Some(category) = &self.category {
            require_text(category, messages::CATEGORY_REQUIRED)?;
        }
        if let Some(images) = &self.images {
            validate_images(images)?;
        }
        if let Some(details) = &self.service_details {
            if !details.has_route() {
                return Err(DomainError::validation(messages::SERVICE_ROUTE_REQUIRED));
            }
        }
        validate_stock(self.stock_quantity)?;
        match (self.has_discount, self.discount_percent) {
            (Some(false), _) => {}
            (Some(true), None) => validate_discount(None)?,
            (_, Some(percent)) => validate_discount(Some(percent))?,
            (None, None) => {}
        }
        Ok(())
    }

    /// Whether the edit touches stock, discount or the out-of-stock flag.
    pub fn touches_premium_fields(&self) -> bool {
        self.stock_quantity.is_some()
            || self.is_out_of_stock.is_some()
            || self.has_discount.is_some()
            || self.discount_percent.is_some()
    }
}

fn validate_price(price: i64) -> DomainResult<()> {
    if price <= 0 {
        Err(DomainError::validation(messages::PRICE_REQUIRED))
    } else if price > MAX_PRICE {
        Err(DomainError::validation(messages::PRICE_TOO_HIGH))
    } else {
        Ok(())
    }
}

fn require_text(value: &str, message: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        Err(DomainError::validation(message))
    } else {
        Ok(())
    }
}

fn validate_images(images: &[String]) -> DomainResult<()> {
    if images.iter().all(|uri| uri.trim().is_empty()) {
        Err(DomainError::validation(messages::IMAGE_REQUIRED))
    } else {
        Ok(())
    }
}

fn validate_stock(stock: Option<i32>) -> DomainResult<()> {
    if stock.is_some_and(|s| s < 0) {
        Err(DomainError::validation(messages::STOCK_INVALID))
    } else {
        Ok(())
    }
}

fn validate_discount(percent: Option<i32>) -> DomainResult<()> {
    match percent {
        Some(p) if (MIN_DISCOUNT_PERCENT..=MAX_DISCOUNT_PERCENT).contains(&p) => Ok(()),
        _ => Err(DomainError::validation(messages::DISCOUNT_INVALID)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn new_product() -> NewProduct {
        NewProduct {
            title: "Chaussures Nike".to_string(),
            description: "Taille 42, très peu portées".to_string(),
            price: 10_000,
            images: vec!["https://cdn.example/img1.jpg".to_string()],
            category: "mode".to_string(),
            sub_category: Some("chaussures".to_string()),
            location: "Dakar".to_string(),
            condition: Some(Condition::Used),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_always_starts_pending() {
        let product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        assert_eq!(product.status, ProductStatus::Pending);
        assert!(product.approved_at.is_none());
    }

    fn assert_rejected(mutate: impl Fn(&mut NewProduct), expected: &str) {
        let mut input = new_product();
        mutate(&mut input);
        assert_eq!(input.validate(), Err(DomainError::validation(expected)));
    }

    #[test]
    fn test_validate_reports_distinct_messages() {
        assert_rejected(|p| p.title = "  ".to_string(), messages::TITLE_REQUIRED);
        assert_rejected(|p| p.description.clear(), messages::DESCRIPTION_REQUIRED);
        assert_rejected(|p| p.price = 0, messages::PRICE_REQUIRED);
        assert_rejected(|p| p.location.clear(), messages::LOCATION_REQUIRED);
        assert_rejected(|p| p.category.clear(), messages::CATEGORY_REQUIRED);
        assert_rejected(|p| p.images.clear(), messages::IMAGE_REQUIRED);
        assert_rejected(|p| p.condition = None, messages::CONDITION_REQUIRED);
        assert_rejected(|p| p.stock_quantity = Some(-1), messages::STOCK_INVALID);
        assert_rejected(
            |p| {
                p.has_discount = true;
                p.discount_percent = Some(95);
            },
            messages::DISCOUNT_INVALID,
        );
    }

    #[test]
    fn test_service_requires_route() {
        let mut input = new_product();
        input.listing_type = ListingType::Service;
        input.condition = None;
        assert_eq!(
            input.validate(),
            Err(DomainError::validation(messages::SERVICE_ROUTE_REQUIRED))
        );

        input.service_details = Some(ServiceDetails {
            departure: "Dakar".to_string(),
            arrival: "Paris".to_string(),
            price_per_kg: Some(8_000),
            ..Default::default()
        });
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_approve_then_reject_is_illegal() {
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        product.approve(Uuid::new_v4());

        let result = product.reject("doublon");
        assert!(matches!(result, Err(DomainError::IllegalTransition(_))));
        assert_eq!(product.status, ProductStatus::Approved);
    }

    #[test]
    fn test_reject_blank_reason_uses_default() {
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        let reason = product.reject("   ").unwrap();
        assert_eq!(reason, messages::DEFAULT_REJECTION_REASON);
        assert_eq!(product.status, ProductStatus::Rejected);
        assert!(product.rejected_at.is_some());
    }

    #[test]
    fn test_reapprove_rejected_clears_reason() {
        let admin = Uuid::new_v4();
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        product.reject("photos floues").unwrap();
        product.approve(admin);

        assert_eq!(product.status, ProductStatus::Approved);
        assert_eq!(product.approved_by, Some(admin));
        assert!(product.rejection_reason.is_none());
    }

    #[test]
    fn test_effective_price_applies_discount() {
        let mut input = new_product();
        input.has_discount = true;
        input.discount_percent = Some(15);
        let product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), input);

        assert_eq!(product.effective_price(), 8_500);
        assert_eq!(product.original_price, Some(10_000));
    }

    #[test]
    fn test_price_above_ceiling_is_refused() {
        let mut input = new_product();
        input.price = MAX_PRICE + 1;
        let err = input.validate().unwrap_err();
        assert_eq!(err, DomainError::validation(messages::PRICE_TOO_HIGH));

        input.price = MAX_PRICE;
        assert!(input.validate().is_ok());

        let patch = ProductPatch {
            price: Some(200_000_000_000_000_000),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err(),
            DomainError::validation(messages::PRICE_TOO_HIGH)
        );
    }

    #[test]
    fn test_effective_price_on_huge_stored_price_does_not_overflow() {
        let mut input = new_product();
        input.has_discount = true;
        input.discount_percent = Some(10);
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), input);
        product.price = 200_000_000_000_000_000;

        assert_eq!(product.effective_price(), 180_000_000_000_000_000);
        assert_eq!(product.snapshot().unit_price, 180_000_000_000_000_000);
    }

    #[test]
    fn test_patch_does_not_reset_status() {
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        product.approve(Uuid::new_v4());
        product.apply_patch(ProductPatch {
            price: Some(12_000),
            ..Default::default()
        });

        assert_eq!(product.status, ProductStatus::Approved);
        assert_eq!(product.price, 12_000);
    }

    #[test]
    fn test_patch_disabling_discount_clears_percent() {
        let mut input = new_product();
        input.has_discount = true;
        input.discount_percent = Some(20);
        let mut product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), input);

        product.apply_patch(ProductPatch {
            has_discount: Some(false),
            ..Default::default()
        });
        assert!(!product.has_discount);
        assert_eq!(product.discount_percent, None);
        assert_eq!(product.effective_price(), 10_000);
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let product = Product::submit(Uuid::new_v4(), Uuid::new_v4(), new_product());
        assert!(product.matches_query("nike"));
        assert!(product.matches_query("DAKAR"));
        assert!(!product.matches_query("adidas"));
    }
}
