//! 採購估算示例

use gel_inventory::*;
use rust_decimal::Decimal;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    logging::init();

    println!("=== 採購估算 ===\n");

    let mut warehouse = Warehouse::default();
    warehouse.set_prices(
        PriceConfig::default()
            .with_material_price(Material::Acrylamide, Decimal::new(42, 1))
            .with_material_price(Material::Glycerin, Decimal::new(18, 1))
            .with_material_price(Material::Water, Decimal::new(5, 2))
            .with_material_price(Material::Photoinitiator, Decimal::new(12, 2))
            .with_material_price(Material::Bis, Decimal::new(9, 2))
            .with_fabric_price(FabricRoll::Gorro, Decimal::from(14))
            .with_fabric_price(FabricRoll::Rodillera, Decimal::from(12)),
    )?;

    let units_per_day: ProductQuantities = [
        ("gorro".to_string(), Decimal::from(20)),
        ("rodilleraM".to_string(), Decimal::from(8)),
        ("rodilleraXL".to_string(), Decimal::from(5)),
    ]
    .into_iter()
    .collect();

    let estimate = warehouse.estimate_purchase(&units_per_day, 15);

    println!("期間 {} 天，共 {} 件\n", estimate.days, estimate.total_units);

    println!("原料:");
    for (material, qty) in estimate.materials.iter() {
        println!("  - {:<26} {:>10}", material.label(), qty.round_dp(2));
    }
    println!("布捲:");
    println!("  - 頭套布 (kg)               {:>10}", estimate.fabric.gorro_kg.round_dp(2));
    println!("  - 護膝布 (kg)               {:>10}", estimate.fabric.rodillera_kg.round_dp(2));

    let costs = &estimate.costs;
    println!("\n成本:");
    println!(
        "  小計  US$ {:>10}  ARS {:>14}",
        costs.subtotal.usd.round_dp(2),
        costs.subtotal.ars.round_dp(2)
    );
    println!(
        "  IVA   US$ {:>10}  ARS {:>14}",
        costs.iva.usd.round_dp(2),
        costs.iva.ars.round_dp(2)
    );
    println!(
        "  總計  US$ {:>10}  ARS {:>14}",
        costs.total.usd.round_dp(2),
        costs.total.ars.round_dp(2)
    );

    println!("\n各產品:");
    for product in &estimate.per_product {
        println!(
            "  - {:<16} {:>5} 件  單價 US$ {:>6}  合計 US$ {:>9}",
            product.name,
            product.qty,
            product.unit.usd.round_dp(2),
            product.total.usd.round_dp(2)
        );
    }

    Ok(())
}
