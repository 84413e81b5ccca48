//! Catalog demo driver.
//!
//! # Responsibility
//! - Replay a fixed add/get/update/delete walkthrough against a real file.
//! - Print every listing so the file effects are visible on stdout.
//!
//! Configuration: first argument or `CATALOG_PATH` selects the catalog file
//! (default `products.json`). `CATALOG_LOG_LEVEL` and `CATALOG_LOG_DIR`
//! configure logging; without a log dir, logs go to stderr.

use catalog_core::{
    core_version, default_log_level, init_logging, JsonCatalogStore, Product, ProductPatch,
    ProductService,
};
use log::warn;
use std::env;
use std::process::ExitCode;

const DEFAULT_CATALOG_PATH: &str = "products.json";

fn main() -> ExitCode {
    let level = env::var("CATALOG_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
    let log_dir = env::var("CATALOG_LOG_DIR").ok();
    if let Err(err) = init_logging(&level, log_dir.as_deref()) {
        eprintln!("catalog_cli: {err}");
        return ExitCode::FAILURE;
    }

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("CATALOG_PATH").ok())
        .unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string());

    println!("catalog_core version={}", core_version());
    println!("catalog file={path}");

    let service = ProductService::new(JsonCatalogStore::new(path));

    print_products("Products", &service.get_products());

    report(service.add_product(
        "producto prueba",
        "Este es un producto prueba",
        200.0,
        "Sin imagen",
        "abc123",
        25,
    ));
    // Same code again: rejected.
    report(service.add_product(
        "producto prueba",
        "Este es un producto prueba",
        200.0,
        "Sin imagen",
        "abc123",
        25,
    ));
    report(service.add_product(
        "otro producto prueba",
        "Este es otro producto prueba",
        600.0,
        "Sin imagen",
        "xyz123",
        50,
    ));
    print_products("Products", &service.get_products());

    for id in [1, 5] {
        match service.get_product_by_id(id) {
            Some(product) => print_products(&format!("Product {id}"), &[product]),
            None => println!("Product {id}: not found"),
        }
    }

    let patch = ProductPatch {
        title: Some("Producto Actualizado".to_string()),
        description: Some("Nueva descripción del producto".to_string()),
        price: Some(150.0),
        stock: Some(77),
        ..ProductPatch::default()
    };
    report(service.update_product(2, &patch));
    report(service.update_product(
        2,
        &ProductPatch {
            id: Some(9),
            ..patch
        },
    ));
    print_products("Products after update", &service.get_products());

    report(service.delete_product(1));
    report(service.delete_product(8));
    print_products("Products after delete", &service.get_products());

    ExitCode::SUCCESS
}

fn report(response: catalog_core::ActionResponse) {
    if response.ok {
        println!("ok: {}", response.message);
    } else {
        println!(
            "failed ({}): {}",
            response.error_code.unwrap_or("unknown"),
            response.message
        );
    }
}

fn print_products(label: &str, products: &[Product]) {
    match serde_json::to_string_pretty(products) {
        Ok(json) => println!("{label}:\n{json}"),
        Err(err) => warn!("event=cli_print module=cli status=error error={err}"),
    }
}
