//! Database layer (Supabase REST).

pub mod supabase;

pub use supabase::SupabaseDb;

/// Table names as constants.
pub mod tables {
    pub const USERS: &str = "users";
    pub const QUOTES: &str = "quotes";
    pub const USER_SETTINGS: &str = "user_settings";
}
