//! SeaORM entity definitions.

pub mod history_entry;
pub mod user_profile;

pub use history_entry::Entity as HistoryEntry;
pub use user_profile::Entity as UserProfile;
