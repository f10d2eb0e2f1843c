//! # Seed Data Generator
//!
//! Populates the database with demo businesses, customers, rewards,
//! promotions and raffles for development.
//!
//! ## Usage
//! ```bash
//! # Seed into the default dev database
//! cargo run -p puntofiel-db --bin seed
//!
//! # Specify database path and customer count
//! cargo run -p puntofiel-db --bin seed -- --db ./data/puntofiel.db --customers 25
//! ```
//!
//! Each business gets a loyalty program with a few rewards, one promotion
//! and one open raffle; every customer gets an initial purchase at each
//! business so cards and ledgers have realistic content.

use std::env;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use puntofiel_core::repository::{
    BusinessRepository, LoyaltyRepository, PromotionRepository, UserRepository,
};
use puntofiel_core::usecases::{CreateRaffleUseCase, CreateRewardUseCase, NewRaffle, NewReward};
use puntofiel_core::{Business, Promotion, User, UserRole};
use puntofiel_db::{Database, DbConfig};

/// Demo businesses with their reward catalogs (name, points required).
const BUSINESSES: &[(&str, &[(&str, i64)])] = &[
    (
        "Café Central",
        &[
            ("Café Gratis", 100),
            ("Postre del día", 180),
            ("Desayuno completo", 350),
        ],
    ),
    (
        "Pizzería Napoli",
        &[
            ("Refresco Gratis", 80),
            ("Pizza personal", 400),
            ("Pizza familiar", 900),
        ],
    ),
    (
        "Librería El Búho",
        &[("Separador artesanal", 50), ("Libro de bolsillo", 600)],
    ),
    (
        "Heladería Polar",
        &[("Cono sencillo", 90), ("Banana split", 250)],
    ),
];

/// Demo customer names.
const CUSTOMERS: &[&str] = &[
    "Ana García",
    "Luis Pérez",
    "María Fernández",
    "Carlos Mendoza",
    "Lucía Ramírez",
    "Jorge Castillo",
    "Sofía Herrera",
    "Diego Torres",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./puntofiel_dev.db");
    let mut customer_count = CUSTOMERS.len();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--customers" | "-c" => {
                if i + 1 < args.len() {
                    customer_count = args[i + 1].parse().unwrap_or(CUSTOMERS.len());
                    i += 1;
                }
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Usage: seed [--db <path>] [--customers <n>]");
                std::process::exit(1);
            }
        }
        i += 1;
    }
    let customer_count = customer_count.min(CUSTOMERS.len());

    info!(db = %db_path, customers = customer_count, "Seeding demo data");

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let now = Utc::now();

    // Customers
    let mut customer_ids = Vec::new();
    for name in CUSTOMERS.iter().take(customer_count) {
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@demo.puntofiel.app", Uuid::new_v4().simple()),
            full_name: (*name).to_string(),
            role: UserRole::Customer,
            created_at: now,
        };
        db.users().create(&user).await?;
        customer_ids.push(user.id);
    }

    // Businesses with rewards, a promotion, a raffle and seeded ledgers
    let create_reward = CreateRewardUseCase::new(Arc::new(db.rewards()));
    let create_raffle = CreateRaffleUseCase::new(Arc::new(db.raffles()));

    for (index, (business_name, rewards)) in BUSINESSES.iter().enumerate() {
        let owner = User {
            id: Uuid::new_v4().to_string(),
            email: format!("{}@demo.puntofiel.app", Uuid::new_v4().simple()),
            full_name: format!("Dueño {business_name}"),
            role: UserRole::Owner,
            created_at: now,
        };
        db.users().create(&owner).await?;

        let business = Business {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.id,
            name: (*business_name).to_string(),
            description: Some(format!("{business_name} — programa de lealtad PuntoFiel")),
            logo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.businesses().create(&business).await?;

        for (reward_name, points) in rewards.iter() {
            create_reward
                .execute(NewReward {
                    business_id: business.id.clone(),
                    name: (*reward_name).to_string(),
                    description: None,
                    points_required: *points,
                    image_url: None,
                })
                .await?;
        }

        let promotion = Promotion {
            id: Uuid::new_v4().to_string(),
            business_id: business.id.clone(),
            title: format!("Semana de puntos dobles en {business_name}"),
            description: None,
            image_url: None,
            starts_at: now,
            ends_at: now + Duration::days(14),
            is_active: true,
            created_at: now,
        };
        db.promotions().create(&promotion).await?;

        create_raffle
            .execute(NewRaffle {
                business_id: business.id.clone(),
                title: format!("Rifa mensual de {business_name}"),
                description: Some("Participa con tus puntos".to_string()),
                image_url: None,
                points_per_ticket: 25,
                max_tickets_per_user: 5,
                starts_at: now,
                ends_at: now + Duration::days(30),
            })
            .await?;

        // An opening purchase per customer, staggered by business so the
        // demo balances differ
        for (offset, customer_id) in customer_ids.iter().enumerate() {
            let amount_cents = 500 + (offset as i64 + index as i64) * 250;
            db.loyalty()
                .process_loyalty(customer_id, &business.id, amount_cents)
                .await?;
        }

        info!(business = %business.name, rewards = rewards.len(), "Business seeded");
    }

    info!(
        businesses = BUSINESSES.len(),
        customers = customer_count,
        "Seed complete"
    );

    Ok(())
}
