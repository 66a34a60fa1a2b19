//! Dependency-ordered clone orchestrator.
//!
//! Stages run in foreign-key dependency order: brands and suppliers
//! first (products reference them), then products, customers, and
//! finally sales (which reference products, customers, registers,
//! users, taxes, and payment types). Each stage pulls source records,
//! transforms them against the identity maps, submits them one at a
//! time, and routes every outcome through the [`CloneLogger`].
//!
//! Per-record failures never abort a stage. A stage is skipped outright
//! only when a stage-level prerequisite is missing (a source listing
//! failed, or no reference names overlap between the accounts), in
//! which case it logs a warning and attempts zero records.

use serde_json::{json, Map, Value};

use posdemo_client::{Created, RecordStore, RemoteError};
use posdemo_core::{
    classify, entity::str_field, map_by_name, name_index_ci, transform_customer,
    transform_inventory, transform_product, transform_sale, EntityKind, ErrorKind, IdMap,
    PricingMode, SaleMaps,
};

use crate::logger::{CloneLogger, LoggerError, RunStatus};

/// Fields accepted when creating a supplier.
const SUPPLIER_FIELDS: &[&str] = &["name", "description", "contact"];

/// Message logged when a sale is rejected before any network call.
const UNRESOLVED_SALE: &str = "Missing required mappings (register, user, or products)";

/// Which stages a clone run performs.
#[derive(Debug, Clone, Copy)]
pub struct CloneOptions {
    pub products: bool,
    pub customers: bool,
    pub sales: bool,
    /// Clone per-outlet stock levels along with products.
    pub inventory: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            products: true,
            customers: true,
            sales: false,
            inventory: true,
        }
    }
}

/// Errors that abort a whole run (only logging failures do; remote
/// failures are recorded and the run continues).
#[derive(Debug, thiserror::Error)]
pub enum CloneError {
    #[error(transparent)]
    Logger(#[from] LoggerError),
}

/// Run a clone from `source` to `dest`.
///
/// The owned-entity maps (brands, suppliers) live here and are passed
/// into the stages that grow or read them; nothing about a run is
/// ambient state. Results accumulate in the logger, which later stages
/// read back (the sales stage resolves product and customer IDs from
/// the logged create results).
pub async fn run_clone(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    options: &CloneOptions,
    logger: &mut CloneLogger,
) -> Result<(), CloneError> {
    let mut brand_map = IdMap::new();
    let mut supplier_map = IdMap::new();
    let mut inventory_counts = (0u32, 0u32);

    if options.products {
        let mode = match dest.pricing_mode().await {
            Ok(mode) => mode,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read destination pricing mode, assuming tax-inclusive");
                PricingMode::Inclusive
            }
        };

        tracing::info!(from = source.label(), to = dest.label(), "Cloning brands");
        clone_owned_stage(source, dest, EntityKind::Brands, logger, &mut brand_map).await?;

        tracing::info!(from = source.label(), to = dest.label(), "Cloning suppliers");
        clone_owned_stage(source, dest, EntityKind::Suppliers, logger, &mut supplier_map).await?;

        tracing::info!(from = source.label(), to = dest.label(), "Cloning products");
        inventory_counts = clone_products(
            source,
            dest,
            logger,
            options.inventory,
            mode,
            &brand_map,
            &supplier_map,
        )
        .await?;
    }

    if options.customers {
        tracing::info!(from = source.label(), to = dest.label(), "Cloning customers");
        clone_customers(source, dest, logger).await?;
    }

    if options.sales {
        if !options.products {
            tracing::warn!("Sales cloning requires products to be cloned; skipping sales");
        } else {
            tracing::info!(from = source.label(), to = dest.label(), "Cloning sales");
            let product_map = logger.created_id_map(EntityKind::Products.as_str());
            let customer_map = logger.created_id_map(EntityKind::Customers.as_str());
            clone_sales(source, dest, logger, &product_map, &customer_map).await?;
        }
    }

    logger.set_inventory_counts(inventory_counts.0, inventory_counts.1)?;
    logger.complete(RunStatus::Completed)?;
    Ok(())
}

/// Clone an owned reference entity (brands or suppliers), deduplicating
/// against destination items by case-insensitive name. Grows `mapping`
/// entry by entry as creates succeed, so product transformation can
/// resolve against it.
async fn clone_owned_stage(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    kind: EntityKind,
    logger: &mut CloneLogger,
    mapping: &mut IdMap,
) -> Result<(), CloneError> {
    let source_items = match source.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "Failed to fetch source records, skipping stage");
            return Ok(());
        }
    };
    if source_items.is_empty() {
        return Ok(());
    }

    let existing = match dest.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "Failed to list destination records, assuming none");
            Vec::new()
        }
    };
    let existing_by_name = name_index_ci(&existing);

    for item in &source_items {
        let Some(source_id) = str_field(item, "id") else {
            continue;
        };
        let name = item
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();

        // Same name already present on the destination: map to it
        // instead of creating a duplicate.
        if let Some(existing_id) = existing_by_name.get(&name.to_lowercase()) {
            mapping.insert(source_id, existing_id.clone());
            continue;
        }

        let payload = owned_payload(kind, item, name);
        match dest.create(kind, &payload).await {
            Ok(created) => {
                record_create(
                    logger,
                    kind.as_str(),
                    Some(source_id),
                    Some(name),
                    &payload,
                    &created,
                    None,
                )?;
                if let Some(new_id) = created.primary_id() {
                    mapping.insert(source_id, new_id);
                }
            }
            Err(e) => {
                record_remote_failure(logger, kind.as_str(), Some(source_id), Some(name), &payload, e)?;
            }
        }
    }
    Ok(())
}

/// Build the create payload for a brand or supplier.
fn owned_payload(kind: EntityKind, item: &Value, name: &str) -> Value {
    match kind {
        EntityKind::Brands => {
            let mut payload = json!({ "name": name });
            if let Some(description) = str_field(item, "description") {
                payload["description"] = Value::String(description.to_string());
            }
            payload
        }
        _ => {
            let fields: Map<String, Value> = item
                .as_object()
                .map(|obj| {
                    obj.iter()
                        .filter(|(k, v)| SUPPLIER_FIELDS.contains(&k.as_str()) && !v.is_null())
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect()
                })
                .unwrap_or_default();
            Value::Object(fields)
        }
    }
}

/// Clone products, then push per-outlet stock levels for each created
/// product when inventory cloning is requested. Returns the
/// (updated, failed) inventory tallies.
async fn clone_products(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    logger: &mut CloneLogger,
    include_inventory: bool,
    mode: PricingMode,
    brands: &IdMap,
    suppliers: &IdMap,
) -> Result<(u32, u32), CloneError> {
    let kind = EntityKind::Products;
    let products = match source.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch source products, skipping stage");
            return Ok((0, 0));
        }
    };
    if products.is_empty() {
        return Ok((0, 0));
    }

    // Pull stock levels up front, keyed by source product ID.
    let mut source_inventory: Vec<(String, Vec<Value>)> = Vec::new();
    if include_inventory {
        for product in &products {
            let Some(product_id) = str_field(product, "id") else {
                continue;
            };
            match source.fetch_inventory(product_id).await {
                Ok(levels) if !levels.is_empty() => {
                    source_inventory.push((product_id.to_string(), levels));
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(product_id, error = %e, "Failed to fetch source inventory");
                }
            }
        }
    }

    // Outlets are matched by exact name; with no overlap at all,
    // inventory cannot be placed anywhere.
    let mut outlet_map = IdMap::new();
    if include_inventory && !source_inventory.is_empty() {
        let source_outlets = source.fetch_all(EntityKind::Outlets).await.unwrap_or_default();
        let dest_outlets = dest.fetch_all(EntityKind::Outlets).await.unwrap_or_default();
        outlet_map = map_by_name(&source_outlets, &dest_outlets);
        if outlet_map.is_empty() {
            tracing::warn!(
                "No matching outlets found between accounts; inventory will not be cloned"
            );
        }
    }

    let mut updated = 0u32;
    let mut failed = 0u32;

    for product in &products {
        let Some(obj) = product.as_object() else {
            continue;
        };
        let transformed = transform_product(obj, mode, brands, suppliers);
        let payload = Value::Object(transformed);

        let source_id = str_field(product, "id");
        let sku = str_field(product, "sku");
        let name = str_field(product, "name");

        let created = match dest.create(kind, &payload).await {
            Ok(created) => created,
            Err(e) => {
                record_remote_failure(logger, kind.as_str(), source_id, sku, &payload, e)?;
                continue;
            }
        };
        let extra = name.map(|n| json!({ "name": n }));
        record_create(logger, kind.as_str(), source_id, sku, &payload, &created, extra)?;

        let Some(new_id) = created.primary_id() else {
            continue;
        };

        // Push stock levels for the freshly created product.
        if include_inventory && !outlet_map.is_empty() {
            let levels = source_id
                .and_then(|id| source_inventory.iter().find(|(pid, _)| pid == id))
                .map(|(_, levels)| transform_inventory(levels, &outlet_map))
                .unwrap_or_default();
            if levels.is_empty() {
                continue;
            }

            let request = serde_json::to_value(&levels)
                .expect("inventory levels are always serialisable");
            match dest.update_inventory(new_id, &levels).await {
                Ok(()) => {
                    updated += 1;
                    logger.log_success("inventory", source_id, new_id, 200, sku, None)?;
                }
                Err(e) => {
                    failed += 1;
                    logger.log_failure(
                        "inventory",
                        source_id,
                        e.status,
                        &e.message,
                        classify(e.status, &e.message),
                        Some(request),
                        e.body,
                        sku,
                    )?;
                }
            }
        }
    }

    Ok((updated, failed))
}

/// Clone customers. No dependencies; the nested group reference is
/// dropped by the transformer.
async fn clone_customers(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    logger: &mut CloneLogger,
) -> Result<(), CloneError> {
    let kind = EntityKind::Customers;
    let customers = match source.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch source customers, skipping stage");
            return Ok(());
        }
    };

    for customer in &customers {
        let Some(obj) = customer.as_object() else {
            continue;
        };
        let payload = Value::Object(transform_customer(obj));

        let source_id = str_field(customer, "id");
        let email = str_field(customer, "email");
        let name = full_name(customer);

        match dest.create(kind, &payload).await {
            Ok(created) => {
                let extra = (!name.is_empty()).then(|| json!({ "name": name }));
                record_create(logger, kind.as_str(), source_id, email, &payload, &created, extra)?;
            }
            Err(e) => {
                record_remote_failure(logger, kind.as_str(), source_id, email, &payload, e)?;
            }
        }
    }
    Ok(())
}

/// Clone sales. Requires the register and user reference maps to be
/// non-empty (otherwise the stage is skipped with zero attempts), and
/// reads product/customer IDs from the earlier stages' logged results.
async fn clone_sales(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    logger: &mut CloneLogger,
    product_map: &IdMap,
    customer_map: &IdMap,
) -> Result<(), CloneError> {
    let kind = EntityKind::Sales;
    let sales = match source.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch source sales, skipping stage");
            return Ok(());
        }
    };
    if sales.is_empty() {
        return Ok(());
    }

    let registers = reference_map(source, dest, EntityKind::Registers).await;
    let users = reference_map(source, dest, EntityKind::Users).await;
    let taxes = reference_map(source, dest, EntityKind::Taxes).await;
    let payment_types = reference_map(source, dest, EntityKind::PaymentTypes).await;

    if registers.is_empty() {
        tracing::warn!("No matching registers between accounts; sales cannot be cloned");
        return Ok(());
    }
    if users.is_empty() {
        tracing::warn!("No matching users between accounts; sales cannot be cloned");
        return Ok(());
    }

    let maps = SaleMaps {
        products: product_map,
        customers: customer_map,
        registers: &registers,
        users: &users,
        taxes: &taxes,
        payment_types: &payment_types,
    };

    for sale in &sales {
        let source_id = str_field(sale, "id");
        let receipt = str_field(sale, "receipt_number");

        let Some(transformed) = transform_sale(sale, &maps) else {
            // Rejected before any network call: a required mapping is
            // missing, which classifies as not_found.
            logger.log_failure(
                kind.as_str(),
                source_id,
                None,
                UNRESOLVED_SALE,
                ErrorKind::NotFound,
                None,
                None,
                receipt,
            )?;
            continue;
        };

        let payload =
            serde_json::to_value(&transformed).expect("sale payload is always serialisable");
        match dest.create(kind, &payload).await {
            Ok(created) => {
                let extra = transformed.total_price.map(|t| json!({ "total": t }));
                record_create(logger, kind.as_str(), source_id, receipt, &payload, &created, extra)?;
            }
            Err(e) => {
                record_remote_failure(logger, kind.as_str(), source_id, receipt, &payload, e)?;
            }
        }
    }
    Ok(())
}

/// Build a reference-entity identity map by fetching both sides and
/// matching on exact name. Fetch failures fall back to an empty map,
/// which the caller treats as a stage-level prerequisite failure.
async fn reference_map(
    source: &dyn RecordStore,
    dest: &dyn RecordStore,
    kind: EntityKind,
) -> IdMap {
    let source_items = match source.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "Failed to fetch source reference records");
            return IdMap::new();
        }
    };
    let dest_items = match dest.fetch_all(kind).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(kind = %kind, error = %e, "Failed to fetch destination reference records");
            return IdMap::new();
        }
    };
    map_by_name(&source_items, &dest_items)
}

/// Route a successful create through the logger. A 2xx response with no
/// parseable ID is logged as a failure instead -- nothing is dropped
/// silently.
fn record_create(
    logger: &mut CloneLogger,
    entity_type: &str,
    source_id: Option<&str>,
    identifier: Option<&str>,
    payload: &Value,
    created: &Created,
    extra: Option<Value>,
) -> Result<(), CloneError> {
    match created.primary_id() {
        Some(new_id) => {
            logger.log_success(entity_type, source_id, new_id, created.status, identifier, extra)?
        }
        None => logger.log_failure(
            entity_type,
            source_id,
            Some(created.status),
            "Create response did not contain an id",
            ErrorKind::Unknown,
            Some(payload.clone()),
            None,
            identifier,
        )?,
    }
    Ok(())
}

/// Route a remote failure through the logger with full request/response
/// context and its classification.
fn record_remote_failure(
    logger: &mut CloneLogger,
    entity_type: &str,
    source_id: Option<&str>,
    identifier: Option<&str>,
    payload: &Value,
    error: RemoteError,
) -> Result<(), CloneError> {
    logger.log_failure(
        entity_type,
        source_id,
        error.status,
        &error.message,
        classify(error.status, &error.message),
        Some(payload.clone()),
        error.body,
        identifier,
    )?;
    Ok(())
}

fn full_name(customer: &Value) -> String {
    let first = str_field(customer, "first_name").unwrap_or_default();
    let last = str_field(customer, "last_name").unwrap_or_default();
    format!("{first} {last}").trim().to_string()
}
