//! # Gel Inventory
//!
//! 凝膠產品庫存、配方換算、跑道預測與縫製流程
//!
//! ```no_run
//! use gel_inventory::{logging, InMemoryStore, WarehouseSession};
//!
//! logging::init();
//! let session = WarehouseSession::open(InMemoryStore::new())?;
//! let report = session.warehouse().projection();
//! println!("最短跑道: {}", report.runway.min_days);
//! # Ok::<(), gel_inventory::StoreError>(())
//! ```

pub mod logging;

pub use gel_calc::{
    Constraint, DayTotal, Days, DemandAggregator, HistoryCalculator, HistoryRange, HourTotal,
    LedgerCalculator, MaterialDays, MaterialRunway, Money, ProductCost, ProductRunway,
    ProductionReceipt, ProjectionReport, PurchaseCosts, PurchaseEstimate, PurchaseEstimator,
    Requirements, RollKilograms, RunwayCalculator, SewingPipeline, Transfer, UsageCalculator,
    Warehouse,
};
pub use gel_core::*;
pub use gel_store::{
    DirtyEntity, DirtyTracker, InMemoryStore, ProductChange, StoreError, StoredRecords,
    SyncPolicy, WarehouseSession, WarehouseStore,
};
