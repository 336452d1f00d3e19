use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, Month, OffsetDateTime};

use finboard::{
    NewTransaction, PasswordHash, Transaction, TransactionType, ValidatedPassword,
    create_transaction, create_user, initialize_db,
};

const TEST_EMAIL: &str = "test@example.com";

/// A utility for creating a test database for the finboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of transactions to create, ending with the current month.
    #[arg(long, short, default_value_t = 6)]
    months: u8,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {TEST_EMAIL} with the password \"test\"...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(TEST_EMAIL, password_hash, &conn)?;

    println!("Creating transactions for the last {} month(s)...", args.months);

    let today = OffsetDateTime::now_utc().date();
    let mut month_start = first_of_month(today);
    let mut transaction_count = 0;

    for month_index in 0..args.months {
        let scale = 1.0 + f64::from(month_index) * 0.05;

        for transaction in monthly_transactions(month_start, scale) {
            if transaction.date > today {
                continue;
            }

            create_transaction(user.id, transaction, &conn)?;
            transaction_count += 1;
        }

        month_start = first_of_month(month_start - Duration::days(1));
    }

    println!("Created {transaction_count} transactions.");
    println!("Success!");

    Ok(())
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// One month of typical household transactions starting on `month_start`.
fn monthly_transactions(month_start: Date, scale: f64) -> Vec<NewTransaction> {
    let day = |day: u8| month_start.replace_day(day).unwrap_or(month_start);
    let amount = |base: f64| (base * scale * 100.0).round() / 100.0;

    let mut transactions = vec![
        Transaction::build(TransactionType::Income, amount(4200.0), day(1))
            .category(Some("Salary".to_owned()))
            .description(Some("Monthly pay".to_owned())),
        Transaction::build(TransactionType::Expense, 1650.0, day(2))
            .category(Some("Rent".to_owned())),
        Transaction::build(TransactionType::Expense, amount(96.4), day(5))
            .category(Some("Utilities".to_owned()))
            .description(Some("Power".to_owned())),
        Transaction::build(TransactionType::Expense, amount(54.0), day(9))
            .category(Some("Transport".to_owned())),
        Transaction::build(TransactionType::Expense, amount(18.5), day(12))
            .description(Some("Coffee beans".to_owned())),
    ];

    for (week, base) in [(3, 142.3), (10, 118.75), (17, 131.2), (24, 125.0)] {
        transactions.push(
            Transaction::build(TransactionType::Expense, amount(base), day(week))
                .category(Some("Groceries".to_owned())),
        );
    }

    if month_start.month() == Month::December {
        transactions.push(
            Transaction::build(TransactionType::Income, 500.0, day(20))
                .category(Some("Bonus".to_owned())),
        );
    }

    transactions
}
