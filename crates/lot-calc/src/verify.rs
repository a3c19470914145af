//! 提交前佔用檢查
//!
//! 本引擎不做任何扣減。提交層應在原子更新前，以最新持久化的剩餘數量
//! 重新檢查，任何一筆衝突即整張單據失敗。

use std::collections::BTreeMap;

use lot_core::{PendingAllocationItem, PurchaseLot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 與最新快照衝突的佔用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaleClaim {
    pub lot_id: String,
    /// 單據對此批次的佔用合計
    pub claimed: Decimal,
    /// 最新剩餘數量（批次不存在時為 None）
    pub remaining: Option<Decimal>,
}

/// 佔用檢查器
pub struct ClaimVerifier;

impl ClaimVerifier {
    /// 按批次彙總佔用，回報剩餘不足或不存在的批次（依批次ID排序）
    pub fn verify(claims: &[PendingAllocationItem], fresh_lots: &[PurchaseLot]) -> Vec<StaleClaim> {
        let mut claimed_by_lot: BTreeMap<&str, Decimal> = BTreeMap::new();
        for claim in claims {
            *claimed_by_lot.entry(claim.lot_id.as_str()).or_insert(Decimal::ZERO) += claim.quantity;
        }

        let stale: Vec<StaleClaim> = claimed_by_lot
            .into_iter()
            .filter_map(|(lot_id, claimed)| {
                let remaining = fresh_lots
                    .iter()
                    .find(|lot| lot.id == lot_id)
                    .map(|lot| lot.remaining_quantity);

                match remaining {
                    Some(remaining) if remaining >= claimed => None,
                    _ => Some(StaleClaim {
                        lot_id: lot_id.to_string(),
                        claimed,
                        remaining,
                    }),
                }
            })
            .collect();

        if !stale.is_empty() {
            tracing::warn!("{} 個批次的佔用已與最新庫存衝突", stale.len());
        }

        stale
    }

    /// 所有佔用是否仍可提交
    pub fn is_committable(claims: &[PendingAllocationItem], fresh_lots: &[PurchaseLot]) -> bool {
        Self::verify(claims, fresh_lots).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lot(id: &str, received: i64, remaining: i64) -> PurchaseLot {
        PurchaseLot::new(
            id.to_string(),
            "MUG".to_string(),
            "MUG-RED".to_string(),
            Decimal::from(received),
            Decimal::from(8),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .with_remaining_quantity(Decimal::from(remaining))
    }

    fn claim(lot_id: &str, qty: i64) -> PendingAllocationItem {
        PendingAllocationItem::new("MUG-RED".to_string(), lot_id.to_string(), Decimal::from(qty))
    }

    #[test]
    fn test_all_claims_still_valid() {
        let fresh = vec![lot("L1", 10, 5), lot("L2", 10, 10)];
        let claims = vec![claim("L1", 3), claim("L1", 2), claim("L2", 1)];

        assert!(ClaimVerifier::verify(&claims, &fresh).is_empty());
        assert!(ClaimVerifier::is_committable(&claims, &fresh));
    }

    #[test]
    fn test_reports_stale_and_missing_lots() {
        // 另一張單據已先提交，L1 只剩 4
        let fresh = vec![lot("L1", 10, 4)];
        let claims = vec![claim("L2", 1), claim("L1", 3), claim("L1", 2)];

        let stale = ClaimVerifier::verify(&claims, &fresh);

        assert_eq!(
            stale,
            vec![
                StaleClaim {
                    lot_id: "L1".to_string(),
                    claimed: Decimal::from(5),
                    remaining: Some(Decimal::from(4)),
                },
                StaleClaim {
                    lot_id: "L2".to_string(),
                    claimed: Decimal::ONE,
                    remaining: None,
                },
            ]
        );
        assert!(!ClaimVerifier::is_committable(&claims, &fresh));
    }
}
