//! Defines the savings goal model and its database queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, money::Amount, user::UserID};

/// The most characters a goal name may have.
pub const GOAL_NAME_MAX_LENGTH: usize = 100;

/// An amount of money a user wants to save by a deadline.
///
/// Goals are funded from the user's balance in the order they were created,
/// see the dashboard for how the balance is shared out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: UserID,
    /// What the user is saving for, e.g. "Emergency fund".
    pub name: String,
    pub target_amount: Amount,
    pub deadline: Date,
}

/// The validated details of a goal that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Amount,
    pub deadline: Date,
}

/// Create the goal table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_amount TEXT NOT NULL,
                deadline TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_goal_user ON goal(user_id);",
        (),
    )?;

    Ok(())
}

const GOAL_COLUMNS: &str = "id, user_id, name, target_amount, deadline";

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    Ok(Goal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        target_amount: row.get(3)?,
        deadline: row.get(4)?,
    })
}

/// Store a new goal owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if `user_id` does not belong to a user, or an
/// [Error::SqlError] if there is some other SQL error.
pub fn create_goal(user_id: UserID, goal: NewGoal, connection: &Connection) -> Result<Goal, Error> {
    connection
        .prepare(&format!(
            "INSERT INTO goal (user_id, name, target_amount, deadline)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {GOAL_COLUMNS}"
        ))?
        .query_row(
            (
                user_id.as_i64(),
                &goal.name,
                goal.target_amount,
                goal.deadline,
            ),
            map_goal_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })
}

/// Get every goal of `user_id` in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_goals_for_user(user_id: UserID, connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goal WHERE user_id = :user_id ORDER BY id ASC"
        ))?
        .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod database_tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        money::Amount,
        test_utils::{create_test_user, get_test_connection},
        user::UserID,
    };

    use super::{NewGoal, create_goal, get_goals_for_user};

    fn new_goal(name: &str, target: &str) -> NewGoal {
        NewGoal {
            name: name.to_owned(),
            target_amount: Amount::new(Decimal::from_str(target).unwrap()).unwrap(),
            deadline: date!(2027 - 01 - 01),
        }
    }

    #[test]
    fn create_succeeds() {
        let connection = get_test_connection();
        let user = create_test_user("ada", &connection);

        let goal = create_goal(user.id, new_goal("Holiday", "2500.50"), &connection).unwrap();

        assert!(goal.id > 0);
        assert_eq!(goal.user_id, user.id);
        assert_eq!(goal.name, "Holiday");
        assert_eq!(goal.target_amount.to_string(), "2500.50");
        assert_eq!(goal.deadline, date!(2027 - 01 - 01));
    }

    #[test]
    fn create_fails_for_unknown_user() {
        let connection = get_test_connection();

        let result = create_goal(UserID::new(7), new_goal("Holiday", "1"), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn lists_in_creation_order() {
        let connection = get_test_connection();
        let user = create_test_user("ada", &connection);
        for name in ["first", "second", "third"] {
            create_goal(user.id, new_goal(name, "10"), &connection).unwrap();
        }

        let names: Vec<_> = get_goals_for_user(user.id, &connection)
            .unwrap()
            .into_iter()
            .map(|goal| goal.name)
            .collect();

        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn lists_only_own_goals() {
        let connection = get_test_connection();
        let ada = create_test_user("ada", &connection);
        let grace = create_test_user("grace", &connection);
        create_goal(grace.id, new_goal("theirs", "10"), &connection).unwrap();

        let goals = get_goals_for_user(ada.id, &connection).unwrap();

        assert!(goals.is_empty());
    }

    #[test]
    fn deleting_user_deletes_goals() {
        let connection = get_test_connection();
        let user = create_test_user("ada", &connection);
        create_goal(user.id, new_goal("Holiday", "10"), &connection).unwrap();

        connection
            .execute("DELETE FROM user WHERE id = ?1", [user.id.as_i64()])
            .unwrap();

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM goal", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
