use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use ledgerly::{
    BudgetInput, Category, Period, TransactionInput, create_transaction, get_timezone,
    initialize_db, upsert_budget,
};

/// A utility for creating a test database for the REST API server of ledgerly.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

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
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let now = OffsetDateTime::now_utc();
    let transactions = [
        (0, 4200.0, Category::Salary, "Monthly pay"),
        (1, 1500.0, Category::Housing, "Rent"),
        (2, 86.4, Category::Food, "Groceries"),
        (5, 120.0, Category::Utilities, "Power bill"),
        (9, 35.0, Category::Entertainment, "Cinema"),
        (33, 4200.0, Category::Salary, "Monthly pay"),
        (35, 1500.0, Category::Housing, "Rent"),
        (38, 64.2, Category::Food, "Groceries"),
    ];

    for (days_ago, amount, category, description) in transactions {
        let input = TransactionInput::new(amount, category.kind(), category)
            .date(now - Duration::days(days_ago))
            .description(description);
        create_transaction(input.validate(now)?, &conn)?;
    }

    println!("Creating test budgets...");

    let utc = get_timezone("Etc/UTC").ok_or("the Etc/UTC timezone is missing")?;
    let current = Period::containing(now, utc);
    for (category, amount) in [
        (Category::Housing, 1500.0),
        (Category::Food, 400.0),
        (Category::Entertainment, 100.0),
    ] {
        upsert_budget(BudgetInput::new(category, amount).validate(current)?, &conn)?;
    }

    println!("Success!");

    Ok(())
}
