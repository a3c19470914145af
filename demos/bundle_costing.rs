//! 組合商品成本範例
//!
//! 禮盒 = 茶葉 ×2 + 茶杯 ×1 + 包裝費；茶杯庫存不足時仍回報完整明細

use chrono::NaiveDate;
use lot_engine::prelude::*;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("===== 組合商品成本範例 =====\n");

    let lots = create_lots();
    let catalog = CompositeCatalog::new().with_product(
        CompositeProduct::new("GIFT-BOX".to_string(), "茶禮盒".to_string())
            .with_component(CompositeComponent::new(
                "TEA".to_string(),
                "TEA-50G".to_string(),
                Decimal::from(2),
            ))
            .with_component(CompositeComponent::new(
                "CUP".to_string(),
                "CUP-WHITE".to_string(),
                Decimal::ONE,
            ))
            .with_fixed_expense(FixedExpense::new("包裝".to_string(), Decimal::new(150, 2))),
    )?;
    let engine = CostingEngine::new(LotSnapshot::new(lots)?, catalog, CostingConfig::default())?;

    // 可用庫存總覽
    println!("[1] 可用庫存");
    for row in engine.availability(None, &[]) {
        println!(
            "    {:<10} 批次 {} 可用 {} 報價 {:?}",
            row.variant_id, row.lot_count, row.total_effective_remaining, row.quoted_price
        );
    }
    println!();

    for units in [2, 4] {
        println!("[2] 需求 {} 組禮盒", units);
        let breakdown = engine.resolve_bundle("GIFT-BOX", Decimal::from(units), &[])?;

        for row in &breakdown.component_breakdown {
            println!(
                "    {:<10} {} × {} @ {} = {}",
                row.variant_id, row.lot_id, row.quantity, row.unit_cost, row.line_cost
            );
        }
        for expense in &breakdown.custom_expenses {
            println!(
                "    {:<10} {} × {} = {}",
                expense.name, expense.unit_amount, expense.units, expense.total
            );
        }
        println!("    組件成本: {}", breakdown.total_component_cost);
        println!("    費用合計: {}", breakdown.total_custom_expenses);
        println!("    總成本: {}", breakdown.total_cost);

        if breakdown.can_fulfill {
            println!("    ✓ 可出貨");
        } else {
            for issue in &breakdown.errors {
                println!("    ✗ {}", issue);
            }
        }
        println!();
    }

    // 未設定售價時以組件報價合計
    let line = engine.cost_line(
        LineItemRequest::composite("GIFT-BOX", Decimal::from(2), BillingType::Retail),
        &[],
    )?;
    println!("[3] 單據明細");
    println!("    單價 {:?}，售價 {:?}，毛利 {:?}", line.unit_price, line.total_price, line.margin());

    Ok(())
}

fn create_lots() -> Vec<PurchaseLot> {
    let date = |month: u32, day: u32| NaiveDate::from_ymd_opt(2024, month, day).unwrap_or_default();

    vec![
        PurchaseLot::new(
            "TEA-A".to_string(),
            "TEA".to_string(),
            "TEA-50G".to_string(),
            Decimal::from(5),
            Decimal::from(10),
            date(1, 1),
        )
        .with_prices(Decimal::from(18), Decimal::from(14)),
        PurchaseLot::new(
            "TEA-B".to_string(),
            "TEA".to_string(),
            "TEA-50G".to_string(),
            Decimal::from(10),
            Decimal::from(12),
            date(2, 1),
        )
        .with_prices(Decimal::from(21), Decimal::from(16)),
        PurchaseLot::new(
            "CUP-A".to_string(),
            "CUP".to_string(),
            "CUP-WHITE".to_string(),
            Decimal::from(3),
            Decimal::from(25),
            date(1, 15),
        )
        .with_prices(Decimal::from(45), Decimal::from(35)),
    ]
}
