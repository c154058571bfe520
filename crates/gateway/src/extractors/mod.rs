//! Request extractors.

mod current_user;
mod validated_json;

pub use current_user::CurrentUser;
pub use validated_json::ValidatedJson;
