use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use housing_expenses::{DEFAULT_CASHBOX_USER_ID, initialize_db};

/// A utility for creating a test database for the housing expenses server.
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

    println!("Creating cash box user...");
    conn.execute(
        "INSERT INTO users (id, user_name, user_post, email) VALUES (?1, ?2, ?3, NULL)",
        (DEFAULT_CASHBOX_USER_ID, "Касса", "Кассир"),
    )?;

    println!("Creating test object...");
    let object_id: i64 = conn.query_row(
        "INSERT INTO objects
            (object_address, object_area, management_fee, current_repair_rate, service_start_date)
        VALUES ('ул. Садовая, 12', 1200.0, 20.0, 8.5, '2022-01-01')
        RETURNING id",
        [],
        |row| row.get(0),
    )?;

    println!("Creating test spending group...");
    conn.execute(
        "INSERT INTO spending_groups (object_id, text) VALUES (?1, 'Текущий ремонт')",
        (object_id,),
    )?;

    println!("Success!");

    Ok(())
}
