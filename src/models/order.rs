use diesel::define_sql_function;
use diesel::sql_types::Text;

/// Status a storefront assigns to orders that never completed.
pub const CANCELLED_STATUS: &str = "cancelled";

define_sql_function! {
    /// SQLite `lower()`, used to compare order statuses case-insensitively.
    fn lower(value: Text) -> Text;
}
