//! 每日看板示例：計劃 → 跑道 → 登記生產 → 縫製流程

use chrono::Utc;
use gel_inventory::*;
use rust_decimal::Decimal;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    logging::init();

    println!("=== 凝膠產品每日看板 ===\n");

    let mut session = WarehouseSession::open(InMemoryStore::new())?;

    // 盤點結果
    session.set_inventory(MaterialAmounts::new(
        Decimal::from(25),
        Decimal::from(60),
        Decimal::from(50),
        Decimal::from(30),
        Decimal::from(120),
    ))?;
    session.set_fabric(
        FabricAmounts::zero()
            .with(Fabric::GorroNariz, Decimal::from(40))
            .with(Fabric::GorroDetras, Decimal::from(35))
            .with(Fabric::RodilleraM, Decimal::from(60))
            .with(Fabric::RodilleraXl, Decimal::from(25)),
    )?;

    session.set_plan_units("gorro", Decimal::from(10))?;
    session.set_plan_units("rodilleraM", Decimal::from(6))?;
    session.set_plan_units("rodilleraXL", Decimal::from(3))?;

    let report = session.warehouse().projection();

    println!("原料跑道:");
    for entry in &report.runway.per_material {
        println!("  - {:<26} {:>8} 天", entry.material.label(), entry.days);
    }
    println!(
        "  最短 {} 天，瓶頸: {}\n",
        report.runway.min_days,
        report.runway.bottleneck.map(|m| m.label()).unwrap_or("—")
    );

    println!("產品跑道:");
    for product in &report.products {
        println!(
            "  - {:<16} {:>8} 天  ({})",
            product.name,
            product.days,
            product.bottleneck_label().unwrap_or("—")
        );
    }

    // 登記今天的生產
    let produced: ProductQuantities = [
        ("gorro".to_string(), Decimal::from(10)),
        ("rodilleraM".to_string(), Decimal::from(6)),
    ]
    .into_iter()
    .collect();

    match session.register_production(&produced, Utc::now()) {
        Ok(receipt) => println!("\n已登記 {} 筆生產紀錄", receipt.logs.len()),
        Err(StoreError::Domain(e)) => println!("\n無法登記: 缺 {}", e.lacks().join(", ")),
        Err(e) => return Err(e.into()),
    }

    let moved = session.send_all_to_sewing()?;
    println!("送縫 {} 項產品，縫製中共 {} 件", moved.len(), session.warehouse().sewing().total());

    let written = session.flush()?;
    println!("同步 {} 筆寫入", written);

    Ok(())
}
