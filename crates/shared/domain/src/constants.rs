//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Regular account that has not published any listing yet
pub const ROLE_BUYER: &str = "buyer";

/// Regular account owning at least one listing
pub const ROLE_SELLER: &str = "seller";

/// Moderator role
pub const ROLE_ADMIN: &str = "admin";

/// Singleton role with authority over admin grants
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

// =============================================================================
// Tiers
// =============================================================================

pub const TIER_STANDARD: &str = "standard";
pub const TIER_PREMIUM: &str = "premium";

/// Active (pending or approved) listings a standard account may hold
pub const STANDARD_MAX_ACTIVE_LISTINGS: u64 = 5;

/// Images per listing for a standard account
pub const STANDARD_MAX_IMAGES: usize = 2;

// =============================================================================
// Listings
// =============================================================================

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";

pub const LISTING_TYPE_PRODUCT: &str = "product";
pub const LISTING_TYPE_SERVICE: &str = "service";

/// Highest listing price accepted, in FCFA
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Allowed range for a promotional discount, in percent
pub const MIN_DISCOUNT_PERCENT: i32 = 1;
pub const MAX_DISCOUNT_PERCENT: i32 = 90;

// =============================================================================
// Orders
// =============================================================================

pub const ORDER_PENDING_PAYMENT: &str = "pending_payment";
pub const ORDER_PAID: &str = "paid";
pub const ORDER_VALIDATED: &str = "validated";
pub const ORDER_REJECTED: &str = "rejected";
pub const ORDER_SHIPPED: &str = "shipped";
pub const ORDER_COMPLETED: &str = "completed";

/// Only supported payment channel
pub const PAYMENT_METHOD_WAVE: &str = "wave";

// =============================================================================
// Reviews
// =============================================================================

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
