//! Field naming for foreign keys without a declared relationship

use std::collections::HashSet;

/// Field name for a foreign key column: the column name without a trailing `_id`
/// (case-insensitive), or the column name followed by `fk_suffix`.
///
/// # Example
///
/// ```rust
/// use schema_bridge::convert::naming::synthesize_field_name;
///
/// assert_eq!(synthesize_field_name("dog_id", "_fk"), "dog");
/// assert_eq!(synthesize_field_name("owner_ID", "_fk"), "owner");
/// assert_eq!(synthesize_field_name("id_car", "_fk"), "id_car_fk");
/// ```
pub fn synthesize_field_name(column: &str, fk_suffix: &str) -> String {
    const ID_SUFFIX: &str = "_id";
    if column.len() > ID_SUFFIX.len() {
        let split = column.len() - ID_SUFFIX.len();
        if column.is_char_boundary(split) && column[split..].eq_ignore_ascii_case(ID_SUFFIX) {
            return column[..split].to_string();
        }
    }
    format!("{}{}", column, fk_suffix)
}

/// Append underscores to `candidate` until it is not in `taken`.
pub fn disambiguate(candidate: String, taken: &HashSet<String>) -> String {
    let mut name = candidate;
    while taken.contains(&name) {
        name.push('_');
    }
    name
}
