use crate::finance::User;

/// Outcome of a hard user delete.
///
/// Deleting a user cascades to the accounts and categories it owns. The ids
/// of the cascaded rows are collected in the same transaction so callers can
/// drop every cached copy of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedUser {
    pub user: User,
    pub account_ids: Vec<i64>,
    pub category_ids: Vec<i64>,
}
