//! Shipping service CLI
//!
//! Reads configuration from TOML file (~/.config/shipping-service/config.toml),
//! connects to the database and applies migrations.
//!
//! ```sh
//! # Migrate with default config
//! shipping-service
//!
//! # Price an order
//! shipping-service quote --city 3 --merchant 12 --charge-type 1 --weight 6.5 --pickup
//!
//! # List active branches matching "cairo"
//! shipping-service list branches --search cairo --active true
//!
//! # Validate config without connecting
//! shipping-service --check
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tracing::{error, info};

use shipping_core::application::{ListingService, ShippingChargeService};
use shipping_core::domain::{
    Branch, ChargeType, City, DeliveryMode, Listing, Merchant, OrderDraft, PaymentType, StoredIn,
    UnitOfWork,
};
use shipping_core::infrastructure::database::migrator::Migrator;
use shipping_core::shared::pagination::PaginationParams;
use shipping_core::telemetry::init_tracing;
use shipping_core::{default_config_path, init_database, AppConfig, SeaOrmStore};

/// Shipping back-office service.
#[derive(Parser, Debug)]
#[command(
    name = "shipping-service",
    version,
    about = "Shipping charge calculation and back-office listings",
    long_about = "Shipping service: prices orders from city, merchant, charge type \
                  and weight, and lists back-office records.\n\n\
                  Default config: ~/.config/shipping-service/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "SHIPPING_CONFIG")]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without connecting.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Print Prometheus metrics before exiting.
    #[arg(long)]
    metrics: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply migrations and exit (default).
    Migrate,

    /// Calculate the shipping charge for an order.
    Quote {
        #[arg(long)]
        city: i32,
        #[arg(long)]
        merchant: i32,
        #[arg(long)]
        charge_type: i32,
        /// Total weight in kg.
        #[arg(long, default_value = "0")]
        weight: Decimal,
        #[arg(long)]
        village: bool,
        /// A representative picks the order up from the merchant.
        #[arg(long)]
        pickup: bool,
        #[arg(long, default_value = "0")]
        order_price: Decimal,
        #[arg(long, value_enum, default_value_t = Payment::Cash)]
        payment: Payment,
    },

    /// Print one page of records as JSON.
    List {
        #[arg(value_enum)]
        entity: ListEntity,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 10)]
        page_size: i64,
        #[arg(long)]
        search: Option<String>,
        /// name, name_desc, id or id_desc.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Payment {
    Cash,
    Prepaid,
    Exchange,
}

impl From<Payment> for PaymentType {
    fn from(p: Payment) -> Self {
        match p {
            Payment::Cash => PaymentType::CashOnDelivery,
            Payment::Prepaid => PaymentType::PaidInAdvance,
            Payment::Exchange => PaymentType::Exchange,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ListEntity {
    Branches,
    Cities,
    Merchants,
    ChargeTypes,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // ── Apply CLI overrides ────────────────────────────────────
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    // ── Config validation mode ─────────────────────────────────
    if cli.check {
        if let Some(e) = load_error {
            return Err(e.into());
        }
        config.validate()?;
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Pool size   : {}", config.database.max_connections);
        println!("   Log level   : {}", config.logging.level);
        println!("   Log format  : {}", config.logging.format);
        return Ok(());
    }

    init_tracing(&config)?;
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }

    // ── Metrics recorder (must be installed before any metrics calls) ──
    let prometheus = if cli.metrics {
        Some(metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?)
    } else {
        None
    };

    // ── Database ───────────────────────────────────────────────
    let db = init_database(&config.database_config()).await?;
    if cli.no_migrate {
        info!("Skipping migrations (--no-migrate)");
    } else {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let store = Arc::new(SeaOrmStore::new(db));
    let uow = UnitOfWork::new(store);

    match cli.command.unwrap_or(Command::Migrate) {
        Command::Migrate => {}
        Command::Quote {
            city,
            merchant,
            charge_type,
            weight,
            village,
            pickup,
            order_price,
            payment,
        } => {
            let draft = OrderDraft {
                city_id: city,
                merchant_id: merchant,
                charge_type_id: charge_type,
                total_weight: weight,
                ships_to_village: village,
                delivery_mode: if pickup {
                    DeliveryMode::MerchantPickup
                } else {
                    DeliveryMode::BranchDelivery
                },
                order_price,
                payment_type: payment.into(),
            };
            let breakdown = match ShippingChargeService::new(&uow)
                .calculate_breakdown(&draft)
                .await
            {
                Ok(breakdown) => breakdown,
                Err(e) => {
                    if e.is_retryable() {
                        error!("Pricing data is temporarily unavailable, try again later");
                    }
                    return Err(e.into());
                }
            };
            let quote = serde_json::json!({
                "charge": breakdown,
                "amount_received_at_delivery": draft.amount_received_at_delivery().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Command::List {
            entity,
            page,
            page_size,
            search,
            sort,
            active,
        } => {
            let mut params = PaginationParams::new(page, page_size);
            if let Some(search) = search {
                params.set_search(search);
            }
            params.set_sort(sort);
            params.set_is_active(active);

            match entity {
                ListEntity::Branches => print_page::<Branch>(&uow, &params).await?,
                ListEntity::Cities => print_page::<City>(&uow, &params).await?,
                ListEntity::Merchants => print_page::<Merchant>(&uow, &params).await?,
                ListEntity::ChargeTypes => print_page::<ChargeType>(&uow, &params).await?,
            }
        }
    }

    uow.dispose();

    if let Some(handle) = prometheus {
        println!("{}", handle.render());
    }
    Ok(())
}

async fn print_page<T>(
    uow: &UnitOfWork<SeaOrmStore>,
    params: &PaginationParams,
) -> Result<(), Box<dyn std::error::Error>>
where
    T: StoredIn<SeaOrmStore> + Listing + Serialize,
{
    let page = ListingService::new(uow).page::<T>(params).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}
