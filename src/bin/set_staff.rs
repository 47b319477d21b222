use std::{error::Error, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::set_staff_status;

/// A utility for granting or revoking access to the admin dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The username of the account to update.
    #[arg(long, short)]
    username: String,

    /// Take staff privileges away instead of granting them.
    #[arg(long)]
    revoke: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    if !db_path.is_file() {
        eprintln!("File does not exist at {db_path:#?}!");
        exit(1);
    }

    let connection = Connection::open(db_path)?;

    match set_staff_status(&args.username, !args.revoke, &connection) {
        Ok(user) if user.is_staff => println!("{} is now staff.", user.username),
        Ok(user) => println!("{} is no longer staff.", user.username),
        Err(error) => {
            eprintln!("Could not update {}: {error}", args.username);
            exit(1);
        }
    }

    Ok(())
}
