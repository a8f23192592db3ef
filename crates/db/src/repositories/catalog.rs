use std::collections::HashMap;

use detailbook_core::models::catalog::{ServiceCatalogItem, VehicleSize};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::{DbAddOn, DbFormula, DbService, DbSizeVariation, DbVehicleSize};

pub async fn get_vehicle_sizes(pool: &Pool<Postgres>, shop_id: Uuid) -> Result<Vec<VehicleSize>> {
    let sizes = sqlx::query_as::<_, DbVehicleSize>(
        r#"
        SELECT id, name
        FROM vehicle_sizes
        WHERE shop_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    Ok(sizes.into_iter().map(VehicleSize::from).collect())
}

/// Loads every service of a shop with its size variations, formulas and add-ons.
pub async fn get_services(pool: &Pool<Postgres>, shop_id: Uuid) -> Result<Vec<ServiceCatalogItem>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, base_price, base_duration_minutes
        FROM services
        WHERE shop_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    let variations = sqlx::query_as::<_, DbSizeVariation>(
        r#"
        SELECT service_id, vehicle_size_id, price, duration_minutes
        FROM service_size_variations
        WHERE shop_id = $1
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    let formulas = sqlx::query_as::<_, DbFormula>(
        r#"
        SELECT service_id, id, name, additional_price, additional_duration_minutes
        FROM service_formulas
        WHERE shop_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    let add_ons = sqlx::query_as::<_, DbAddOn>(
        r#"
        SELECT service_id, id, name, price, duration_minutes
        FROM service_add_ons
        WHERE shop_id = $1
        ORDER BY position ASC, id ASC
        "#,
    )
    .bind(shop_id)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Loaded catalog for shop {}: {} services, {} variations, {} formulas, {} add-ons",
        shop_id,
        services.len(),
        variations.len(),
        formulas.len(),
        add_ons.len()
    );

    Ok(assemble_catalog(services, variations, formulas, add_ons))
}

/// Groups child rows under their service, preserving the order of `services`.
pub fn assemble_catalog(
    services: Vec<DbService>,
    variations: Vec<DbSizeVariation>,
    formulas: Vec<DbFormula>,
    add_ons: Vec<DbAddOn>,
) -> Vec<ServiceCatalogItem> {
    let mut items: Vec<ServiceCatalogItem> = services
        .into_iter()
        .map(|service| ServiceCatalogItem {
            id: service.id,
            name: service.name,
            base_price: service.base_price,
            base_duration_minutes: u32::try_from(service.base_duration_minutes)
                .unwrap_or_default(),
            vehicle_size_variations: Default::default(),
            formulas: Vec::new(),
            add_ons: Vec::new(),
        })
        .collect();
    let index: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(position, item)| (item.id.clone(), position))
        .collect();

    for variation in &variations {
        if let Some(&position) = index.get(&variation.service_id) {
            items[position]
                .vehicle_size_variations
                .insert(variation.vehicle_size_id.clone(), variation.into());
        }
    }
    for formula in formulas {
        if let Some(&position) = index.get(&formula.service_id) {
            items[position].formulas.push(formula.into());
        }
    }
    for add_on in add_ons {
        if let Some(&position) = index.get(&add_on.service_id) {
            items[position].add_ons.push(add_on.into());
        }
    }

    items
}
