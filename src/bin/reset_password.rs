use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use rusqlite::Connection;

use finboard::{PasswordHash, ValidatedPassword, get_user_by_email, update_password};

/// Set a new password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// Email address of the account to update.
    #[arg(long)]
    email: String,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            print_error(&message);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    if args.db_path.extension().is_none_or(|extension| extension.is_empty()) {
        return Err("the database path needs a file extension, e.g. 'finboard.db'".to_owned());
    }

    if !args.db_path.is_file() {
        return Err(format!("no database found at {}", args.db_path.display()));
    }

    let connection = Connection::open(&args.db_path)
        .map_err(|error| format!("could not open the database: {error}"))?;
    let user = get_user_by_email(&args.email, &connection)
        .map_err(|error| format!("could not find a user with the email {}: {error}", args.email))?;

    println!("Resetting password for {}", user.email);

    // Closing stdin at a prompt cancels without an error.
    let Some(password_hash) = read_new_password()? else {
        return Ok(());
    };

    update_password(user.id, &password_hash, &connection)
        .map_err(|error| format!("could not save the new password: {error}"))?;

    println!("Password updated.");

    Ok(())
}

/// `Ok(None)` when stdin is closed.
fn prompt(message: &str) -> Result<Option<String>, String> {
    match rpassword::prompt_password(message) {
        Ok(input) => Ok(Some(input)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(format!("could not read the password: {error}")),
    }
}

/// Ask until the user gives the same strong password twice.
fn read_new_password() -> Result<Option<PasswordHash>, String> {
    loop {
        println!();

        let Some(password) = prompt("New password: ")? else {
            return Ok(None);
        };

        let validated = match ValidatedPassword::new(&password) {
            Ok(validated) => validated,
            Err(error) => {
                print_error(&error.to_string());
                continue;
            }
        };

        let Some(confirmation) = prompt("Repeat the new password: ")? else {
            return Ok(None);
        };

        if password != confirmation {
            print_error("the passwords do not match, try again");
            continue;
        }

        return PasswordHash::new(validated, PasswordHash::DEFAULT_COST)
            .map(Some)
            .map_err(|error| format!("could not hash the password: {error}"));
    }
}

/// Print `message` to stderr in bold red, starting with a capital letter.
fn print_error(message: &str) {
    let mut chars = message.chars();
    let message: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    eprintln!("\x1b[31;1m{message}\x1b[0m");
}
