//! The `posdemo` binary.
//!
//! Two subcommands: `generate` fills one account with synthetic demo
//! data, `clone` copies data from one account to another. Credentials
//! come from the environment (or a `.env` file): `TARGET_DOMAIN` /
//! `TARGET_TOKEN` for generation, `SOURCE_DOMAIN` / `SOURCE_TOKEN` /
//! `DEST_DOMAIN` / `DEST_TOKEN` for cloning.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use posdemo_client::{AccountClient, RetailerInfo};
use posdemo_clone::{run_clone, CloneLogger, CloneOptions};
use posdemo_core::EntityKind;
use posdemo_generate::{
    generate_customers, generate_sales, vertical_by_prefix, ProductGenerator, SaleContext,
    SellableProduct, VERTICALS,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posdemo=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("generate", sub)) => run_generate(sub).await,
        Some(("clone", sub)) => run_clone_command(sub).await,
        _ => unreachable!("subcommand is required"),
    }
}

fn cli() -> Command {
    Command::new("posdemo")
        .about("Demo-data generation and account cloning for retail POS accounts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Fill the target account with synthetic demo data")
                .arg(
                    Arg::new("vertical")
                        .long("vertical")
                        .default_value("APP")
                        .help("Retail vertical prefix: APP, ELE, HOM, BTY, or LIQ"),
                )
                .arg(
                    Arg::new("products")
                        .long("products")
                        .default_value("50")
                        .value_parser(value_parser!(usize))
                        .help("Number of products to create"),
                )
                .arg(
                    Arg::new("customers")
                        .long("customers")
                        .default_value("50")
                        .value_parser(value_parser!(usize))
                        .help("Number of customers to create"),
                )
                .arg(
                    Arg::new("sales")
                        .long("sales")
                        .default_value("0")
                        .value_parser(value_parser!(usize))
                        .help("Number of closed sales to create against the new data"),
                ),
        )
        .subcommand(
            Command::new("clone")
                .about("Copy data from the source account to the destination account")
                .arg(
                    Arg::new("skip-products")
                        .long("skip-products")
                        .action(ArgAction::SetTrue)
                        .help("Skip products (and their brands, suppliers, and inventory)"),
                )
                .arg(
                    Arg::new("skip-customers")
                        .long("skip-customers")
                        .action(ArgAction::SetTrue)
                        .help("Skip customers"),
                )
                .arg(
                    Arg::new("skip-inventory")
                        .long("skip-inventory")
                        .action(ArgAction::SetTrue)
                        .help("Clone products without their stock levels"),
                )
                .arg(
                    Arg::new("sales")
                        .long("sales")
                        .action(ArgAction::SetTrue)
                        .help("Also clone sales history (requires products)"),
                )
                .arg(
                    Arg::new("logs-dir")
                        .long("logs-dir")
                        .default_value("logs")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for the operation log"),
                ),
        )
}

fn env_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} is not set"))
}

/// Build a client and verify its credentials with a `GET /retailer`
/// before doing anything else.
async fn connect(
    role: &str,
    domain: &str,
    token: &str,
) -> anyhow::Result<(AccountClient, RetailerInfo)> {
    let client = AccountClient::new(domain, token);
    let retailer = client
        .retailer()
        .await
        .with_context(|| format!("Could not connect to {role} account '{domain}'"))?;
    tracing::info!(role, account = %retailer.name, domain, "Connected");
    Ok((client, retailer))
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

async fn run_generate(matches: &ArgMatches) -> anyhow::Result<()> {
    let prefix = matches
        .get_one::<String>("vertical")
        .map(String::as_str)
        .unwrap_or("APP")
        .to_uppercase();
    let vertical = vertical_by_prefix(&prefix).ok_or_else(|| {
        let known: Vec<_> = VERTICALS.iter().map(|v| v.prefix).collect();
        anyhow!("Unknown vertical '{prefix}' (expected one of {})", known.join(", "))
    })?;
    let product_count = *matches.get_one::<usize>("products").unwrap_or(&50);
    let customer_count = *matches.get_one::<usize>("customers").unwrap_or(&50);
    let sale_count = *matches.get_one::<usize>("sales").unwrap_or(&0);

    let (client, retailer) = connect(
        "target",
        &env_var("TARGET_DOMAIN")?,
        &env_var("TARGET_TOKEN")?,
    )
    .await?;
    let mode = retailer.pricing_mode();
    let mut rng = rand::rng();

    tracing::info!(vertical = vertical.name, count = product_count, "Creating products");
    let mut generator = ProductGenerator::new(vertical, mode);
    let mut sellable = Vec::new();
    let mut product_failures = 0u32;
    for payload in generator.generate_many(&mut rng, product_count) {
        match client.create(EntityKind::Products, &payload).await {
            Ok((ids, _)) => {
                if let Some(id) = ids.first() {
                    let price = payload
                        .get(mode.price_field())
                        .and_then(serde_json::Value::as_f64)
                        .unwrap_or(0.0);
                    sellable.push(SellableProduct {
                        product_id: id.clone(),
                        price,
                    });
                }
            }
            Err(e) => {
                product_failures += 1;
                tracing::warn!(error = %e, "Product creation failed");
            }
        }
    }
    tracing::info!(created = sellable.len(), failed = product_failures, "Products done");

    tracing::info!(count = customer_count, "Creating customers");
    let mut customer_ids = Vec::new();
    let mut customer_failures = 0u32;
    for payload in generate_customers(&mut rng, customer_count) {
        match client.create(EntityKind::Customers, &payload).await {
            Ok((ids, _)) => customer_ids.extend(ids),
            Err(e) => {
                customer_failures += 1;
                tracing::warn!(error = %e, "Customer creation failed");
            }
        }
    }
    tracing::info!(created = customer_ids.len(), failed = customer_failures, "Customers done");

    if sale_count > 0 {
        create_sales(&client, &mut rng, &sellable, &customer_ids, sale_count).await?;
    }
    Ok(())
}

/// Resolve the references every sale is charged against and create the
/// requested number of sales.
async fn create_sales(
    client: &AccountClient,
    rng: &mut impl rand::Rng,
    products: &[SellableProduct],
    customers: &[String],
    count: usize,
) -> anyhow::Result<()> {
    if products.is_empty() {
        tracing::warn!("No products were created; skipping sales");
        return Ok(());
    }

    let registers = client.list(EntityKind::Registers).await?;
    let users = client.list(EntityKind::Users).await?;
    let payment_types = client.list(EntityKind::PaymentTypes).await?;
    let taxes = client.list(EntityKind::Taxes).await?;

    let context = SaleContext {
        register_id: first_id(&registers).context("Account has no registers")?,
        user_id: first_id(&users).context("Account has no users")?,
        // Cash if the account has it, otherwise whatever comes first.
        payment_type_id: id_by_name(&payment_types, "cash")
            .or_else(|| first_id(&payment_types))
            .context("Account has no payment types")?,
        // Prefer a zero-rate tax so generated totals stay simple.
        tax_id: id_by_name(&taxes, "no tax")
            .or_else(|| first_id(&taxes))
            .context("Account has no taxes")?,
    };

    tracing::info!(count, "Creating sales");
    let mut created = 0u32;
    let mut failed = 0u32;
    for payload in generate_sales(rng, products, customers, &context, count) {
        match client.create(EntityKind::Sales, &payload).await {
            Ok(_) => created += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(error = %e, "Sale creation failed");
            }
        }
    }
    tracing::info!(created, failed, "Sales done");
    Ok(())
}

fn first_id(items: &[serde_json::Value]) -> Option<String> {
    items
        .first()
        .and_then(|item| item.get("id"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// Find an item whose name contains `needle`, case-insensitively.
fn id_by_name(items: &[serde_json::Value], needle: &str) -> Option<String> {
    items
        .iter()
        .find(|item| {
            item.get("name")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(needle))
        })
        .and_then(|item| item.get("id"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// clone
// ---------------------------------------------------------------------------

async fn run_clone_command(matches: &ArgMatches) -> anyhow::Result<()> {
    let (source, _) = connect(
        "source",
        &env_var("SOURCE_DOMAIN")?,
        &env_var("SOURCE_TOKEN")?,
    )
    .await?;
    let (dest, _) =
        connect("destination", &env_var("DEST_DOMAIN")?, &env_var("DEST_TOKEN")?).await?;
    if source.domain() == dest.domain() {
        return Err(anyhow!("Source and destination accounts must differ"));
    }

    let options = CloneOptions {
        products: !matches.get_flag("skip-products"),
        customers: !matches.get_flag("skip-customers"),
        inventory: !matches.get_flag("skip-inventory"),
        sales: matches.get_flag("sales"),
    };
    let logs_dir = matches
        .get_one::<PathBuf>("logs-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("logs"));

    let mut logger = CloneLogger::create(&logs_dir, source.domain(), dest.domain())?;
    tracing::info!(log = %logger.path().display(), "Operation log started");

    run_clone(&source, &dest, &options, &mut logger).await?;

    for kind in EntityKind::ALL {
        let counts = logger.entity_counts(kind.as_str());
        if counts.success > 0 || counts.failed > 0 {
            tracing::info!(
                kind = kind.as_str(),
                success = counts.success,
                failed = counts.failed,
                "Stage summary"
            );
        }
    }
    tracing::info!(log = %logger.path().display(), "Clone complete");
    Ok(())
}
