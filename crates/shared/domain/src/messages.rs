//! User-facing messages.
//!
//! Every failure path carries a specific, actionable message. They are kept
//! together so the wording stays consistent between controllers.

use crate::constants::{STANDARD_MAX_ACTIVE_LISTINGS, STANDARD_MAX_IMAGES};

// Session
pub const LOGIN_REQUIRED: &str = "Vous devez être connecté pour effectuer cette action";
pub const ADMIN_REQUIRED: &str = "Action réservée aux administrateurs";
pub const SUPER_ADMIN_REQUIRED: &str = "Action réservée au super administrateur";
pub const SUPER_ADMIN_IMMUTABLE: &str = "Le super administrateur ne peut pas être modifié";
pub const SUPER_ADMIN_UNDELETABLE: &str = "Le super administrateur ne peut pas être supprimé";
pub const CANNOT_DELETE_SELF: &str = "Vous ne pouvez pas supprimer votre propre compte";

// Accounts
pub const PHONE_REQUIRED: &str = "Le numéro de téléphone est obligatoire";
pub const PHONE_TAKEN: &str = "Ce numéro de téléphone est déjà utilisé";
pub const NAME_REQUIRED: &str = "Le nom est obligatoire";
pub const UNKNOWN_PHONE: &str = "Aucun compte associé à ce numéro";
pub const WRONG_PASSWORD: &str = "Mot de passe incorrect";
pub const USER_NOT_FOUND: &str = "Utilisateur introuvable";
pub const ALREADY_PREMIUM: &str = "Votre compte est déjà premium";
pub const PREMIUM_ALREADY_PENDING: &str = "Une demande premium est déjà en cours de traitement";
pub const NO_PREMIUM_REQUEST: &str = "Aucune demande premium en attente pour cet utilisateur";

// Listings
pub const TITLE_REQUIRED: &str = "Le titre est obligatoire";
pub const DESCRIPTION_REQUIRED: &str = "La description est obligatoire";
pub const PRICE_REQUIRED: &str = "Le prix doit être supérieur à 0";
pub const PRICE_TOO_HIGH: &str = "Le prix dépasse le maximum autorisé";
pub const LOCATION_REQUIRED: &str = "La localisation est obligatoire";
pub const CATEGORY_REQUIRED: &str = "La catégorie est obligatoire";
pub const IMAGE_REQUIRED: &str = "Ajoutez au moins une photo";
pub const CONDITION_REQUIRED: &str = "Précisez l'état du produit";
pub const SERVICE_ROUTE_REQUIRED: &str = "Précisez le départ et la destination du service";
pub const STOCK_INVALID: &str = "Le stock ne peut pas être négatif";
pub const DISCOUNT_INVALID: &str = "La réduction doit être comprise entre 1 et 90 %";
pub const STOCK_PREMIUM_ONLY: &str = "La gestion du stock est réservée aux comptes premium";
pub const DISCOUNT_PREMIUM_ONLY: &str = "Les promotions sont réservées aux comptes premium";
pub const OUT_OF_STOCK_PREMIUM_ONLY: &str =
    "Le marquage en rupture de stock est réservé aux comptes premium";
pub const PRODUCT_NOT_FOUND: &str = "Annonce introuvable";
pub const NOT_PRODUCT_OWNER: &str = "Vous ne pouvez modifier que vos propres annonces";
pub const CANNOT_DELETE_PRODUCT: &str = "Vous ne pouvez supprimer que vos propres annonces";
pub const DEFAULT_REJECTION_REASON: &str =
    "Votre annonce ne respecte pas nos conditions de publication";

/// Quota message for standard accounts that already hold the maximum of active listings.
pub fn listing_quota_reached() -> String {
    format!(
        "Limite de {} annonces actives atteinte. Passez à premium pour publier sans limite",
        STANDARD_MAX_ACTIVE_LISTINGS
    )
}

/// Image limit message for standard accounts.
pub fn image_quota_reached() -> String {
    format!(
        "Les comptes standard sont limités à {} photos par annonce",
        STANDARD_MAX_IMAGES
    )
}

// Cart & orders
pub const QUANTITY_INVALID: &str = "La quantité doit être au moins 1";
pub const PRODUCT_UNAVAILABLE: &str = "Cette annonce n'est pas disponible à la vente";
pub const PRODUCT_OUT_OF_STOCK: &str = "Ce produit est en rupture de stock";
pub const NOT_IN_CART: &str = "Ce produit n'est pas dans le panier";
pub const EMPTY_CART: &str = "Votre panier est vide";
pub const AMOUNT_OVERFLOW: &str = "Montant de commande invalide";
pub const DELIVERY_NAME_REQUIRED: &str = "Le nom du destinataire est obligatoire";
pub const DELIVERY_PHONE_REQUIRED: &str = "Le téléphone de livraison est obligatoire";
pub const DELIVERY_ADDRESS_REQUIRED: &str = "L'adresse de livraison est obligatoire";
pub const DELIVERY_CITY_REQUIRED: &str = "La ville de livraison est obligatoire";
pub const ORDER_NOT_FOUND: &str = "Commande introuvable";
pub const NOT_ORDER_BUYER: &str = "Cette commande ne vous appartient pas";
pub const ORDER_REJECTION_REASON_REQUIRED: &str = "Indiquez le motif du rejet de la commande";

/// Stock message when the requested quantity exceeds what is left.
pub fn insufficient_stock(available: i32) -> String {
    format!("Stock insuffisant : {} disponible(s)", available)
}

// Reviews
pub const RATING_INVALID: &str = "La note doit être comprise entre 1 et 5";
pub const REVIEW_ORDER_NOT_COMPLETED: &str =
    "Vous pourrez laisser un avis une fois la commande terminée";
pub const REVIEW_NOT_BUYER: &str = "Seul l'acheteur peut évaluer cette commande";
pub const REVIEW_PRODUCT_NOT_IN_ORDER: &str = "Ce produit ne fait pas partie de la commande";
pub const REVIEW_ALREADY_SUBMITTED: &str = "Vous avez déjà laissé un avis pour cette commande";

// Notifications
pub const NOTIFICATION_NOT_FOUND: &str = "Notification introuvable";
