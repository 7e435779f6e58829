use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Words MySQL refuses as bare column or table names. Message and field
/// names like `order` or `key` are common, so these get backticks.
const MYSQL_RESERVED: [&str; 48] = [
    "add", "all", "alter", "and", "as", "asc", "between", "by", "case", "check",
    "column", "condition", "create", "cross", "default", "delete", "desc", "distinct", "drop", "else",
    "exists", "from", "function", "group", "having", "in", "index", "inner", "insert", "interval",
    "into", "is", "join", "key", "like", "limit", "match", "not", "null", "or",
    "order", "range", "rank", "select", "table", "to", "update", "where",
];

/// Double-quotes `text` as a JSON string literal.
pub fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{}\"", text))
}

/// Backtick-quotes a table or column name when it is not a plain word or
/// is reserved.
pub fn escape_identifier(name: &str) -> String {
    let reserved = MYSQL_RESERVED.contains(&name.to_ascii_lowercase().as_str());
    if IDENTIFIER.is_match(name) && !reserved {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}
