use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime};

use finance_tracker::{
    Amount, NewGoal, NewTransaction, NewUser, PasswordHash, TransactionType, User,
    ValidatedPassword, create_goal, create_transaction, create_user, initialize_db,
    set_staff_status,
};

/// A utility for creating a test database for the finance_tracker server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const TEST_PASSWORD: &str = "test";

/// (title, amount, type, category, days ago)
const SAMPLE_TRANSACTIONS: [(&str, i64, TransactionType, &str, i64); 8] = [
    ("Salary", 4200, TransactionType::Income, "Work", 3),
    ("Rent", 1600, TransactionType::Expense, "Housing", 5),
    ("Groceries", 180, TransactionType::Expense, "Food", 8),
    ("Power bill", 140, TransactionType::Expense, "Utilities", 20),
    ("Salary", 4200, TransactionType::Income, "Work", 33),
    ("Rent", 1600, TransactionType::Expense, "Housing", 35),
    ("Dinner out", 95, TransactionType::Expense, "Food", 62),
    ("Concert tickets", 220, TransactionType::Expense, "Entertainment", 120),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path
        .extension()
        .is_none_or(|extension| extension.is_empty())
    {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let connection = Connection::open(output_path)?;

    initialize_db(&connection)?;

    println!("Creating test users...");
    let user = create_test_user("test", &connection)?;
    create_test_user("admin", &connection)?;
    set_staff_status("admin", true, &connection)?;

    println!("Creating transactions and goals...");
    let today = OffsetDateTime::now_utc().date();
    create_sample_transactions(&user, today, &connection)?;

    for (name, target, months_away) in [("Emergency fund", 3000, 6), ("Holiday", 2500, 12)] {
        create_goal(
            user.id,
            NewGoal {
                name: name.to_owned(),
                target_amount: Amount::new(Decimal::from(target))?,
                deadline: today + Duration::days(30 * months_away),
            },
            &connection,
        )?;
    }

    println!("Success! Log in as 'test' or 'admin' with the password '{TEST_PASSWORD}'.");

    Ok(())
}

fn create_test_user(username: &str, connection: &Connection) -> Result<User, Box<dyn Error>> {
    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked(TEST_PASSWORD),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        NewUser {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash,
            first_name: String::new(),
            last_name: String::new(),
            phone_number: None,
            date_of_birth: None,
            bio: String::new(),
        },
        connection,
    )?;

    Ok(user)
}

fn create_sample_transactions(
    user: &User,
    today: Date,
    connection: &Connection,
) -> Result<(), Box<dyn Error>> {
    for (title, amount, transaction_type, category, days_ago) in SAMPLE_TRANSACTIONS {
        create_transaction(
            user.id,
            NewTransaction {
                title: title.to_owned(),
                amount: Amount::new(Decimal::from(amount))?,
                transaction_type,
                date: today - Duration::days(days_ago),
                category: category.to_owned(),
            },
            connection,
        )?;
    }

    Ok(())
}
