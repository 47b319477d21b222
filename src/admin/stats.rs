//! Site-wide counts and recent activity for the admin dashboard.

use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{Error, money::Amount, transaction::TransactionType};

/// How many of the newest users are listed.
const RECENT_USER_COUNT: i64 = 5;
/// How many of the newest transactions are listed.
const RECENT_TRANSACTION_COUNT: i64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecentUser {
    pub username: String,
    pub email: String,
    pub date_joined: OffsetDateTime,
}

/// A transaction along with the name of the user who recorded it.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct RecentTransaction {
    pub username: String,
    pub title: String,
    pub amount: Amount,
    pub transaction_type: TransactionType,
    pub date: Date,
}

/// Counts across every user of the site.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SiteStats {
    pub total_users: i64,
    pub active_users: i64,
    pub total_transactions: i64,
    pub total_goals: i64,
    pub users_with_transactions: i64,
    pub users_with_goals: i64,
    /// Newest first.
    pub recent_users: Vec<RecentUser>,
    /// Latest date first.
    pub recent_transactions: Vec<RecentTransaction>,
}

fn count(query: &str, connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row(query, [], |row| row.get(0))
        .map_err(Error::from)
}

fn get_recent_users(connection: &Connection) -> Result<Vec<RecentUser>, Error> {
    connection
        .prepare(
            "SELECT username, email, date_joined FROM user
             ORDER BY date_joined DESC, id DESC
             LIMIT ?1",
        )?
        .query_map([RECENT_USER_COUNT], |row| {
            Ok(RecentUser {
                username: row.get(0)?,
                email: row.get(1)?,
                date_joined: row.get(2)?,
            })
        })?
        .map(|maybe_user| maybe_user.map_err(Error::from))
        .collect()
}

fn get_recent_transactions(connection: &Connection) -> Result<Vec<RecentTransaction>, Error> {
    connection
        .prepare(
            "SELECT user.username, t.title, t.amount, t.transaction_type, t.date
             FROM \"transaction\" t
             INNER JOIN user ON user.id = t.user_id
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?1",
        )?
        .query_map([RECENT_TRANSACTION_COUNT], |row| {
            Ok(RecentTransaction {
                username: row.get(0)?,
                title: row.get(1)?,
                amount: row.get(2)?,
                transaction_type: row.get(3)?,
                date: row.get(4)?,
            })
        })?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Gather the numbers shown on the admin dashboard.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub(super) fn get_site_stats(connection: &Connection) -> Result<SiteStats, Error> {
    Ok(SiteStats {
        total_users: count("SELECT COUNT(*) FROM user", connection)?,
        active_users: count("SELECT COUNT(*) FROM user WHERE is_active = 1", connection)?,
        total_transactions: count("SELECT COUNT(*) FROM \"transaction\"", connection)?,
        total_goals: count("SELECT COUNT(*) FROM goal", connection)?,
        users_with_transactions: count(
            "SELECT COUNT(DISTINCT user_id) FROM \"transaction\"",
            connection,
        )?,
        users_with_goals: count("SELECT COUNT(DISTINCT user_id) FROM goal", connection)?,
        recent_users: get_recent_users(connection)?,
        recent_transactions: get_recent_transactions(connection)?,
    })
}
