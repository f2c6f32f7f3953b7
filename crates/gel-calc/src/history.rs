//! 生產歷史：依日/小時分桶加總

use chrono::{FixedOffset, NaiveDate, Timelike};
use gel_core::ProductionLog;
use rust_decimal::Decimal;
use serde::Serialize;

/// 歷史區間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryRange {
    /// 最近 7 天（含今天）
    Week,
    /// 最近 30 天（含今天）
    Month,
}

impl HistoryRange {
    pub fn days(self) -> u64 {
        match self {
            HistoryRange::Week => 7,
            HistoryRange::Month => 30,
        }
    }
}

/// 單日合計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayTotal {
    pub day: NaiveDate,
    pub total: Decimal,
}

/// 單一小時合計
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourTotal {
    /// 0..=23
    pub hour: u32,
    pub total: Decimal,
}

/// 生產歷史計算器
pub struct HistoryCalculator;

impl HistoryCalculator {
    /// 以 `today` 結尾的每日桶（含首尾）
    pub fn day_buckets(today: NaiveDate, range: HistoryRange) -> Vec<NaiveDate> {
        let start = today
            .checked_sub_days(chrono::Days::new(range.days() - 1))
            .unwrap_or(NaiveDate::MIN);

        let mut buckets = Vec::with_capacity(range.days() as usize);
        let mut current = Some(start);
        while let Some(day) = current.filter(|d| *d <= today) {
            buckets.push(day);
            current = day.succ_opt();
        }
        buckets
    }

    /// 區間內每日生產件數
    ///
    /// 紀錄時間先換算到 `offset` 時區再歸入日期。
    pub fn daily_totals(
        logs: &[ProductionLog],
        today: NaiveDate,
        range: HistoryRange,
        offset: FixedOffset,
    ) -> Vec<DayTotal> {
        Self::day_buckets(today, range)
            .into_iter()
            .map(|day| DayTotal {
                day,
                total: logs
                    .iter()
                    .filter(|log| log.timestamp.with_timezone(&offset).date_naive() == day)
                    .map(|log| log.qty)
                    .fold(Decimal::ZERO, Decimal::saturating_add),
            })
            .collect()
    }

    /// 區間總件數
    pub fn period_total(totals: &[DayTotal]) -> Decimal {
        totals
            .iter()
            .map(|t| t.total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// 指定日期的 24 個小時桶
    pub fn hourly_totals(
        logs: &[ProductionLog],
        day: NaiveDate,
        offset: FixedOffset,
    ) -> Vec<HourTotal> {
        let mut totals: Vec<HourTotal> = (0..24)
            .map(|hour| HourTotal {
                hour,
                total: Decimal::ZERO,
            })
            .collect();

        for log in logs {
            let local = log.timestamp.with_timezone(&offset);
            if local.date_naive() != day {
                continue;
            }
            if let Some(bucket) = totals.get_mut(local.hour() as usize) {
                bucket.total = bucket.total.saturating_add(log.qty);
            }
        }
        totals
    }
}
