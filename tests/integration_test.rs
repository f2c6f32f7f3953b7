//! 集成測試

use chrono::{NaiveDate, TimeZone, Utc};
use gel_inventory::*;
use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;

fn request(pairs: &[(&str, i64)]) -> ProductQuantities {
    pairs
        .iter()
        .map(|(id, q)| (id.to_string(), Decimal::from(*q)))
        .collect()
}

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, day, hour, 30, 0).unwrap()
}

/// 開啟一個有庫存的工作階段
fn stocked_session() -> WarehouseSession<InMemoryStore> {
    logging::init_test();

    let mut session = WarehouseSession::open(InMemoryStore::new()).unwrap();
    session
        .set_inventory(MaterialAmounts::new(
            Decimal::from(25),
            Decimal::from(60),
            Decimal::from(50),
            Decimal::from(30),
            Decimal::from(120),
        ))
        .unwrap();
    session
        .set_fabric(
            FabricAmounts::zero()
                .with(Fabric::GorroNariz, Decimal::from(40))
                .with(Fabric::GorroDetras, Decimal::from(35))
                .with(Fabric::RodilleraM, Decimal::from(60))
                .with(Fabric::RodilleraXl, Decimal::from(25)),
        )
        .unwrap();
    session.flush().unwrap();
    session
}

#[test]
fn test_full_day_of_production() {
    // 場景：設定計劃 → 查看跑道 → 登記生產 → 送縫 → 完成 → 重新載入
    let mut session = stocked_session();

    // 1. 計劃：每天 10 個頭套、6 個護膝 M
    session.set_plan_units("gorro", Decimal::from(10)).unwrap();
    session
        .set_plan_units("rodilleraM", Decimal::from(6))
        .unwrap();

    let report = session.warehouse().projection();
    // 凝膠 8 + 3 = 11 kg/天
    assert_eq!(report.daily_usage.acrylamide_kg, Decimal::new(165, 2));
    assert_eq!(report.daily_fabric_usage.gorro_detras, Decimal::from(10));
    assert!(report.runway.bottleneck.is_some());

    let gorro = report
        .products
        .iter()
        .find(|p| p.product_id == "gorro")
        .unwrap();
    // 後片 35 / 10 = 3.5 天，早於任何原料
    assert_eq!(gorro.days, Days::Finite(Decimal::new(35, 1)));
    assert_eq!(
        gorro.bottleneck,
        Some(Constraint::Fabric(Fabric::GorroDetras))
    );
    assert!(report
        .products
        .iter()
        .find(|p| p.product_id == "rodilleraXL")
        .unwrap()
        .days
        .is_unbounded());

    // 2. 登記生產
    let receipt = session
        .register_production(&request(&[("gorro", 10), ("rodilleraM", 6)]), at(3, 9))
        .unwrap();
    assert_eq!(receipt.logs.len(), 2);
    assert_eq!(receipt.consumed.fabric.rodillera_m, Decimal::from(6));
    assert_eq!(
        session.warehouse().stock().materials.acrylamide_kg,
        Decimal::new(2335, 2)
    );

    // 3. 送縫與完成
    let moved = session
        .send_to_sewing(&request(&[("gorro", 4), ("rodilleraM", 50)]))
        .unwrap();
    assert_eq!(moved.len(), 2);
    assert_eq!(session.warehouse().to_sew().get("gorro"), 6);
    assert_eq!(session.warehouse().to_sew().get("rodilleraM"), 0);
    assert_eq!(session.warehouse().sewing().get("rodilleraM"), 6);

    session
        .retire_from_sewing(&request(&[("rodilleraM", 2)]))
        .unwrap();
    assert_eq!(session.warehouse().sewing().get("rodilleraM"), 4);

    session.flush().unwrap();

    // 4. 重新載入後狀態一致
    let (warehouse, store) = session.into_parts();
    let reopened = WarehouseSession::open(store).unwrap();

    assert_eq!(reopened.warehouse().stock(), warehouse.stock());
    assert_eq!(reopened.warehouse().to_sew(), warehouse.to_sew());
    assert_eq!(reopened.warehouse().sewing(), warehouse.sewing());
    assert_eq!(reopened.warehouse().logs(), warehouse.logs());
    assert_eq!(
        reopened.warehouse().plan_units("rodilleraM"),
        Decimal::from(6)
    );
}

#[test]
fn test_shortage_reports_every_lack_and_changes_nothing() {
    let mut session = stocked_session();
    let before = session.warehouse().state().clone();

    let err = session
        .register_production(&request(&[("gorro", 41), ("rodilleraXL", 26)]), at(3, 10))
        .unwrap_err();

    let StoreError::Domain(domain) = &err else {
        panic!("預期領域錯誤: {err}");
    };
    assert_eq!(
        domain.lacks(),
        ["Tela gorro nariz", "Tela gorro detrás", "Tela rodillera XL"]
    );
    assert_eq!(session.warehouse().state(), &before);
    assert!(!session.has_pending_changes());
}

#[test]
fn test_receipts_extend_runway() {
    let mut session = stocked_session();
    session.set_plan_units("rodilleraXL", Decimal::from(5)).unwrap();

    let before = session.warehouse().product_runway();
    session
        .add_fabric(&FabricAmounts::zero().with(Fabric::RodilleraXl, Decimal::from(25)))
        .unwrap();
    let after = session.warehouse().product_runway();

    let xl = |runways: &[ProductRunway]| {
        runways
            .iter()
            .find(|r| r.product_id == "rodilleraXL")
            .map(|r| r.days)
            .unwrap()
    };
    assert_eq!(xl(&before), Days::Finite(Decimal::from(5)));
    assert!(xl(&after) > xl(&before));
}

#[test]
fn test_history_after_productions() {
    let mut session = stocked_session();
    session
        .register_production(&request(&[("gorro", 2)]), at(1, 8))
        .unwrap();
    session
        .register_production(&request(&[("gorro", 3)]), at(3, 8))
        .unwrap();
    session
        .register_production(&request(&[("rodilleraM", 4)]), at(3, 14))
        .unwrap();

    let today = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
    let week = session.warehouse().daily_history(today, HistoryRange::Week);
    assert_eq!(week.len(), 7);
    assert_eq!(HistoryCalculator::period_total(&week), Decimal::from(9));
    assert_eq!(week[6].total, Decimal::from(7));

    let hours = session.warehouse().hourly_history(today);
    assert_eq!(hours[8].total, Decimal::from(3));
    assert_eq!(hours[14].total, Decimal::from(4));
}

#[rstest]
#[case(1, 11)]
#[case(7, 77)]
fn test_purchase_estimate_scales_with_days(#[case] days: u32, #[case] gorros: i64) {
    let session = stocked_session();

    let estimate = session
        .warehouse()
        .estimate_purchase(&request(&[("gorro", 11)]), days);

    assert_eq!(estimate.total_units, Decimal::from(gorros));
    assert_eq!(estimate.fabric.gorro_kg, Decimal::from(days));
    assert_eq!(estimate.fabric.rodillera_kg, Decimal::ZERO);
}

#[test]
fn test_catalog_edits_are_persisted() {
    let mut session = stocked_session();

    let neck = session
        .create_product("Cuello", Decimal::from(300))
        .unwrap();
    session
        .update_product(
            &neck.id,
            ProductPatch {
                fabrics: Some(vec![FabricRequirement::one(Fabric::RodilleraM)]),
                ..Default::default()
            },
        )
        .unwrap();
    session.delete_product("rodilleraXL").unwrap();
    session.flush().unwrap();

    let records = session.store().load_all().unwrap();
    let ids: Vec<_> = records.products.iter().map(|p| p.id.as_str()).collect();
    assert!(ids.contains(&neck.id.as_str()));
    assert!(!ids.contains(&"rodilleraXL"));

    let stored_neck = records.products.iter().find(|p| p.id == neck.id).unwrap();
    assert_eq!(stored_neck.fabric_rolls(), vec![FabricRoll::Rodillera]);
}

#[test]
fn test_invalid_configuration_rejected() {
    let mut session = stocked_session();

    let err = session
        .set_coefficients(Coefficients::default().with(Material::Glycerin, Decimal::from(-1)))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Domain(GelError::InvalidConfiguration { .. })
    ));

    let err = session
        .add_product(Product::new("roto", "Roto", Decimal::ZERO))
        .unwrap_err();
    assert!(err.is_domain());
    assert!(!session.has_pending_changes());
}

/// 與 `stocked_session` 相同庫存的倉庫（不經過儲存）
fn stocked_warehouse() -> Warehouse {
    let mut warehouse = Warehouse::default();
    warehouse.set_inventory(MaterialAmounts::new(
        Decimal::from(25),
        Decimal::from(60),
        Decimal::from(50),
        Decimal::from(30),
        Decimal::from(120),
    ));
    warehouse.set_fabric(
        FabricAmounts::zero()
            .with(Fabric::GorroNariz, Decimal::from(40))
            .with(Fabric::GorroDetras, Decimal::from(35))
            .with(Fabric::RodilleraM, Decimal::from(60))
            .with(Fabric::RodilleraXl, Decimal::from(25)),
    );
    warehouse
}

proptest! {
    #[test]
    fn prop_registration_is_all_or_nothing(
        gorro in -5i64..60,
        rodilla_m in -5i64..80,
        rodilla_xl in -5i64..40,
    ) {
        let mut warehouse = stocked_warehouse();
        let before = warehouse.state().clone();
        let req = request(&[("gorro", gorro), ("rodilleraM", rodilla_m), ("rodilleraXL", rodilla_xl)]);

        match warehouse.register_production(&req, at(3, 9)) {
            Ok(receipt) => {
                let expected_materials = before
                    .stock
                    .materials
                    .checked_sub(&receipt.consumed.materials)
                    .unwrap();
                let expected_fabric = before
                    .stock
                    .fabric
                    .checked_sub(&receipt.consumed.fabric)
                    .unwrap();
                prop_assert_eq!(warehouse.stock().materials, expected_materials);
                prop_assert_eq!(warehouse.stock().fabric, expected_fabric);

                let produced: Vec<_> = req.iter().filter(|(_, q)| **q > Decimal::ZERO).collect();
                prop_assert_eq!(receipt.logs.len(), produced.len());
                for (id, qty) in produced {
                    prop_assert_eq!(
                        Decimal::from(warehouse.to_sew().get(id)),
                        Decimal::from(before.to_sew.get(id)) + *qty
                    );
                }
            }
            Err(err) => {
                let is_expected_err = matches!(
                    err,
                    GelError::InsufficientStock { .. } | GelError::EmptyProduction
                );
                prop_assert!(is_expected_err);
                prop_assert_eq!(warehouse.state(), &before);
            }
        }
    }
}
