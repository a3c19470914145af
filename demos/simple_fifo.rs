//! # 簡單 FIFO 配貨範例
//!
//! 兩個採購批次、一張草稿單據：
//! - 第一筆明細把最早批次用完並溢出到下一批
//! - 報價批次隨之變動
//! - 提交前以最新庫存檢查佔用

use chrono::NaiveDate;
use lot_engine::prelude::*;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("===== 簡單 FIFO 配貨範例 =====\n");

    // ========== 1. 建立批次快照 ==========
    println!("[1] 建立批次快照");
    let lots = vec![
        PurchaseLot::new(
            "LOT-2024-001".to_string(),
            "TEA".to_string(),
            "TEA-50G".to_string(),
            Decimal::from(5),
            Decimal::from(10),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        )
        .with_prices(Decimal::from(18), Decimal::from(14))
        .with_supplier("山茶行".to_string()),
        PurchaseLot::new(
            "LOT-2024-002".to_string(),
            "TEA".to_string(),
            "TEA-50G".to_string(),
            Decimal::from(5),
            Decimal::from(12),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap_or_default(),
        )
        .with_prices(Decimal::from(21), Decimal::from(16)),
    ];
    for lot in &lots {
        println!(
            "    {} 進貨日 {} 剩餘 {} 單位成本 {}",
            lot.id, lot.purchase_date, lot.remaining_quantity, lot.unit_cost
        );
    }
    let engine = CostingEngine::new(
        LotSnapshot::new(lots.clone())?,
        CompositeCatalog::new(),
        CostingConfig::default().with_money_scale(2),
    )?;
    println!();

    // ========== 2. 加入明細 ==========
    println!("[2] 草稿單據加入明細");
    let mut document = DraftDocument::new();

    let added = document.add_line(
        &engine,
        LineItemRequest::single("TEA", "TEA-50G", Decimal::from(7), BillingType::Retail),
    )?;
    if let Some(line) = document.line(added.line_id) {
        for claim in &line.claims {
            println!("    佔用 {} × {}", claim.lot_id, claim.quantity);
        }
        println!(
            "    成本 {}，售價 {:?}，可出貨 {}",
            line.total_cost(),
            line.total_price,
            line.can_fulfill()
        );
    }
    for change in &added.price_changes {
        println!("    ⚠ {} 報價批次變動：{:?}", change.variant_id, change.transition);
    }
    println!();

    // ========== 3. 缺貨明細 ==========
    println!("[3] 再加入 5 個（只剩 3 個）");
    let added = document.add_line(
        &engine,
        LineItemRequest::single("TEA", "TEA-50G", Decimal::from(5), BillingType::Retail),
    )?;
    if let Some(line) = document.line(added.line_id) {
        for issue in &line.issues {
            println!("    ✗ [{}] {}", issue.code(), issue);
        }
    }
    println!();

    // ========== 4. 單據合計 ==========
    let totals = document.totals();
    println!("[4] 單據合計");
    println!("    總成本: {}", totals.total_cost);
    println!("    總售價: {}", totals.total_price);
    println!("    毛利: {}", totals.margin);
    println!("    未報價明細: {}", totals.unpriced_lines);
    println!();

    // ========== 5. 提交前檢查 ==========
    println!("[5] 提交前檢查（另一張單據已用掉 LOT-2024-001 的 4 個）");
    let fresh: Vec<PurchaseLot> = lots
        .into_iter()
        .map(|lot| {
            if lot.id == "LOT-2024-001" {
                lot.with_remaining_quantity(Decimal::ONE)
            } else {
                lot
            }
        })
        .collect();
    let stale = ClaimVerifier::verify(&document.own_claims(), &fresh);
    if stale.is_empty() {
        println!("    ✓ 可提交");
    } else {
        for claim in &stale {
            println!("    ✗ {} 佔用 {}，最新剩餘 {:?}", claim.lot_id, claim.claimed, claim.remaining);
        }
    }

    Ok(())
}
