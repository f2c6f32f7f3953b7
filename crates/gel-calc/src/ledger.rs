//! 庫存扣帳：計算生產所需並以單一交易扣減

use gel_core::{Coefficients, Product, ProductQuantities, StockLedger};

use crate::demand::{DemandAggregator, Requirements};

/// 扣帳計算器
pub struct LedgerCalculator;

impl LedgerCalculator {
    /// 試算：檢查庫存是否足夠，不修改庫存
    pub fn check(
        stock: &StockLedger,
        products: &[Product],
        coefficients: &Coefficients,
        request: &ProductQuantities,
    ) -> gel_core::Result<Requirements> {
        let required = DemandAggregator::requirements(products, request, coefficients)?;
        let lacks = stock.shortages(&required.materials, &required.fabric);
        if lacks.is_empty() {
            Ok(required)
        } else {
            Err(gel_core::GelError::InsufficientStock { lacks })
        }
    }

    /// 檢查並扣帳
    ///
    /// 全有或全無：任一項不足時回傳所有缺料且不做任何扣減。
    pub fn check_and_debit(
        stock: &mut StockLedger,
        products: &[Product],
        coefficients: &Coefficients,
        request: &ProductQuantities,
    ) -> gel_core::Result<Requirements> {
        let required = DemandAggregator::requirements(products, request, coefficients)?;
        stock.debit(&required.materials, &required.fabric)?;
        Ok(required)
    }
}
