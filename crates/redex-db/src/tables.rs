use redb::TableDefinition;

/// Table for key-value state such as per-visitor favorites.
/// Key: storage key, e.g. "cocktail-favorites:<visitor>"
/// Value: stored bytes (JSON)
pub const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Prefix every favorites key shares.
pub const FAVORITES_PREFIX: &str = "cocktail-favorites";

/// Storage key for one visitor's favorites.
pub fn favorites_key(visitor: &str) -> String {
    format!("{}:{}", FAVORITES_PREFIX, visitor)
}
