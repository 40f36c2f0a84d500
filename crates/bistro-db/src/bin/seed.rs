//! # Seed Data Generator
//!
//! Populates the database with development data: a cashier, two devices
//! with printer routes, a POS profile over a small restaurant catalog,
//! and currency exchange rates.
//!
//! ## Usage
//! ```bash
//! cargo run -p bistro-db --bin seed
//! cargo run -p bistro-db --bin seed -- --db ./data/bistro-pos.db
//! ```
//!
//! Default login after seeding: cashier code `1001`, password `1234`.

use chrono::Utc;
use std::env;
use uuid::Uuid;

use bistro_core::{Cashier, DevicePrinterRow, Item, ItemGroup, PosProfile};
use bistro_db::{hash_secret, Database, DbConfig};

/// (group, parent, is_group) rows of the demo hierarchy.
const GROUPS: &[(&str, Option<&str>, bool)] = &[
    ("Food", None, true),
    ("Burgers", Some("Food"), false),
    ("Sides", Some("Food"), false),
    ("Drinks", None, true),
    ("Hot Drinks", Some("Drinks"), false),
    ("Cocktails", Some("Drinks"), false),
];

/// (code, group, rate in cents) rows of the demo items.
const ITEMS: &[(&str, &str, i64)] = &[
    ("BURGER", "Burgers", 5000),
    ("CHEESEBURGER", "Burgers", 6500),
    ("DOUBLE-BURGER", "Burgers", 8500),
    ("FRIES", "Sides", 1500),
    ("ONION-RINGS", "Sides", 1800),
    ("COLESLAW", "Sides", 1200),
    ("ESPRESSO", "Hot Drinks", 2000),
    ("TURKISH-COFFEE", "Hot Drinks", 2200),
    ("MINT-TEA", "Hot Drinks", 1500),
    ("B52", "Cocktails", 12000),
    ("MOJITO", "Cocktails", 10000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db_path = parse_db_path();
    println!("Seeding database at {db_path}");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    seed_cashier(&db).await?;
    seed_devices(&db).await?;
    seed_catalog(&db).await?;
    seed_currencies(&db).await?;

    println!("Done. Login with cashier code 1001 / password 1234.");
    Ok(())
}

fn parse_db_path() -> String {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .unwrap_or_else(|| "./bistro-pos.db".to_string())
}

async fn seed_cashier(db: &Database) -> anyhow::Result<()> {
    let now = Utc::now();
    let cashier = Cashier {
        id: Uuid::new_v4().to_string(),
        cashier_code: "1001".to_string(),
        password_hash: hash_secret("1234")?,
        full_name: "Demo Cashier".to_string(),
        email: Some("cashier@example.com".to_string()),
        enabled: true,
        api_key: None,
        api_secret_hash: None,
        created_at: now,
        updated_at: now,
    };
    db.cashiers().insert(&cashier).await?;
    println!("  cashier 1001 ({})", cashier.full_name);
    Ok(())
}

async fn seed_devices(db: &Database) -> anyhow::Result<()> {
    db.devices().insert("TILL-01", "Front Till", true).await?;
    db.devices().insert("TILL-02", "Bar Till", true).await?;

    let printing = db.printing();
    for (device, class, printer) in [
        ("TILL-01", "Hot Kitchen", "kitchen-printer"),
        ("TILL-01", "Bar", "bar-printer"),
        ("TILL-02", "Bar", "bar-printer"),
    ] {
        printing
            .insert_route(&DevicePrinterRow {
                device_id: device.to_string(),
                print_class: class.to_string(),
                preparation_printer: printer.to_string(),
                connection_info: format!("tcp://{printer}:9100"),
                backup_printer: Some("front-printer".to_string()),
                backup_connection_info: Some("tcp://front-printer:9100".to_string()),
            })
            .await?;
    }
    println!("  2 devices, 3 printer routes");
    Ok(())
}

async fn seed_catalog(db: &Database) -> anyhow::Result<()> {
    let catalog = db.catalog();

    for (id, parent, is_group) in GROUPS {
        catalog
            .insert_group(&ItemGroup {
                id: id.to_string(),
                group_name: id.to_string(),
                parent_group_id: parent.map(str::to_string),
                is_group: *is_group,
            })
            .await?;
    }

    for (code, group, rate_cents) in ITEMS {
        catalog
            .insert_item(&Item {
                id: code.to_string(),
                item_name: title_case(code),
                description: None,
                uom: "Unit".to_string(),
                rate_cents: *rate_cents,
                group_id: group.to_string(),
                disabled: false,
            })
            .await?;
    }

    catalog
        .insert_profile(&PosProfile {
            id: "Main Cashier".to_string(),
            profile_name: "Main Cashier".to_string(),
            disabled: false,
        })
        .await?;
    catalog.link_profile_group("Main Cashier", "Food").await?;
    catalog.link_profile_group("Main Cashier", "Drinks").await?;

    println!("  {} groups, {} items, 1 profile", GROUPS.len(), ITEMS.len());
    Ok(())
}

async fn seed_currencies(db: &Database) -> anyhow::Result<()> {
    let currencies = db.currencies();
    currencies.insert_rate("USD", 48.5).await?;
    currencies.insert_rate("EUR", 52.1).await?;
    currencies.insert_rate("SAR", 12.9).await?;
    println!("  3 exchange rates");
    Ok(())
}

/// "DOUBLE-BURGER" → "Double Burger"
fn title_case(code: &str) -> String {
    code.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
