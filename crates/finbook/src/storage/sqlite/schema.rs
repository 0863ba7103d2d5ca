//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Timestamps are stored as fixed-width RFC 3339 UTC
//! strings so lexical order matches chronological order.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('wallet', 'current', 'savings')),
    currency_code TEXT NOT NULL,
    opening_balance_cents INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    parent_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_accounts_user_id ON accounts(user_id);
CREATE INDEX IF NOT EXISTS idx_categories_user_id ON categories(user_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_categories_user_name
    ON categories(user_id, name) WHERE deleted_at IS NULL;
"#;

// User queries
const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";

pub fn insert_user() -> String {
    format!(
        "INSERT INTO users (name, email, password_hash, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {USER_COLUMNS}"
    )
}

pub fn select_user_by_id() -> String {
    format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1")
}

pub fn select_user_by_email() -> String {
    format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1")
}

pub fn select_users() -> String {
    format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC")
}

pub fn update_user() -> String {
    format!(
        "UPDATE users SET \
            name = COALESCE(?1, name), \
            email = COALESCE(?2, email), \
            password_hash = COALESCE(?3, password_hash), \
            updated_at = ?4 \
         WHERE id = ?5 RETURNING {USER_COLUMNS}"
    )
}

pub const SELECT_ACCOUNT_IDS_BY_USER: &str = "SELECT id FROM accounts WHERE user_id = ?1";

pub const SELECT_CATEGORY_IDS_BY_USER: &str = "SELECT id FROM categories WHERE user_id = ?1";

pub const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

// Account queries
const ACCOUNT_COLUMNS: &str = "id, user_id, name, type AS account_type, currency_code, \
     opening_balance_cents, created_at, updated_at, deleted_at";

pub fn insert_account() -> String {
    format!(
        "INSERT INTO accounts \
            (user_id, name, type, currency_code, opening_balance_cents, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING {ACCOUNT_COLUMNS}"
    )
}

pub fn select_account_by_id() -> String {
    format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1 AND deleted_at IS NULL")
}

pub fn select_accounts() -> String {
    format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE deleted_at IS NULL \
         ORDER BY created_at DESC, id DESC"
    )
}

pub fn update_account() -> String {
    format!(
        "UPDATE accounts SET \
            name = COALESCE(?1, name), \
            type = COALESCE(?2, type), \
            currency_code = COALESCE(?3, currency_code), \
            opening_balance_cents = COALESCE(?4, opening_balance_cents), \
            updated_at = ?5 \
         WHERE id = ?6 AND deleted_at IS NULL RETURNING {ACCOUNT_COLUMNS}"
    )
}

pub const SOFT_DELETE_ACCOUNT: &str =
    "UPDATE accounts SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";

// Category queries
const CATEGORY_COLUMNS: &str =
    "id, user_id, parent_id, name, kind, created_at, updated_at, deleted_at";

pub fn insert_category() -> String {
    format!(
        "INSERT INTO categories (user_id, parent_id, name, kind, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?5) RETURNING {CATEGORY_COLUMNS}"
    )
}

pub fn select_category_by_id() -> String {
    format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1 AND deleted_at IS NULL")
}

pub fn select_categories_by_user() -> String {
    format!(
        "SELECT {CATEGORY_COLUMNS} FROM categories \
         WHERE user_id = ?1 AND deleted_at IS NULL \
         ORDER BY created_at DESC, id DESC"
    )
}

pub fn update_category() -> String {
    format!(
        "UPDATE categories SET \
            name = COALESCE(?1, name), \
            kind = COALESCE(?2, kind), \
            updated_at = ?3 \
         WHERE id = ?4 AND deleted_at IS NULL RETURNING {CATEGORY_COLUMNS}"
    )
}

pub fn soft_delete_category() -> String {
    format!(
        "UPDATE categories SET deleted_at = ?1, updated_at = ?1 \
         WHERE id = ?2 AND deleted_at IS NULL RETURNING {CATEGORY_COLUMNS}"
    )
}

pub const PING: &str = "SELECT 1";
