//! 縫製流程：待縫製 → 縫製中 → 完成

use gel_core::{ProductQuantities, StageCounts};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// 一次移轉的結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    pub product_id: String,
    pub qty: u64,
}

/// 縫製流程計算器
///
/// 所有操作都不會讓任何階段件數變成負數。
pub struct SewingPipeline;

impl SewingPipeline {
    /// 請求數量取整：`floor(max(0, qty))`，超出範圍時飽和
    pub fn whole_units(qty: Decimal) -> u64 {
        if qty <= Decimal::ZERO {
            return 0;
        }
        qty.floor().to_u64().unwrap_or(u64::MAX)
    }

    /// 生產完成：待縫製 += 生產數量（取整）
    pub fn produce(to_sew: &mut StageCounts, produced: &ProductQuantities) -> Vec<Transfer> {
        produced
            .iter()
            .filter_map(|(id, qty)| {
                let units = Self::whole_units(*qty);
                if units == 0 {
                    return None;
                }
                to_sew.add(id, units);
                Some(Transfer {
                    product_id: id.clone(),
                    qty: units,
                })
            })
            .collect()
    }

    /// 送縫：`send = min(floor(max(0, req)), 待縫製[p])`
    pub fn send_to_sewing(
        to_sew: &mut StageCounts,
        sewing: &mut StageCounts,
        dispatch: &ProductQuantities,
    ) -> Vec<Transfer> {
        let mut moved = Vec::new();
        for (id, qty) in dispatch {
            let sent = to_sew.take(id, Self::whole_units(*qty));
            if sent == 0 {
                continue;
            }
            sewing.add(id, sent);
            moved.push(Transfer {
                product_id: id.clone(),
                qty: sent,
            });
        }

        if !moved.is_empty() {
            tracing::debug!("送縫 {} 項產品", moved.len());
        }
        moved
    }

    /// 全部送縫
    pub fn send_all_to_sewing(to_sew: &mut StageCounts, sewing: &mut StageCounts) -> Vec<Transfer> {
        let dispatch = Self::as_quantities(to_sew);
        Self::send_to_sewing(to_sew, sewing, &dispatch)
    }

    /// 完成縫製：`縫製中[p] -= min(floor(max(0, req)), 縫製中[p])`
    pub fn retire_from_sewing(sewing: &mut StageCounts, dispatch: &ProductQuantities) -> Vec<Transfer> {
        dispatch
            .iter()
            .filter_map(|(id, qty)| {
                let retired = sewing.take(id, Self::whole_units(*qty));
                (retired > 0).then(|| Transfer {
                    product_id: id.clone(),
                    qty: retired,
                })
            })
            .collect()
    }

    /// 全部完成
    pub fn retire_all(sewing: &mut StageCounts) -> Vec<Transfer> {
        let dispatch = Self::as_quantities(sewing);
        Self::retire_from_sewing(sewing, &dispatch)
    }

    fn as_quantities(counts: &StageCounts) -> ProductQuantities {
        counts
            .iter()
            .map(|(id, qty)| (id.to_string(), Decimal::from(qty)))
            .collect()
    }
}
