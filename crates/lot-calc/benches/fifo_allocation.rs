//! FIFO 配貨效能測試

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lot_calc::{AvailabilityCalculator, FifoAllocator};
use lot_core::{BillingType, PendingAllocationItem, PurchaseLot};
use rust_decimal::Decimal;

fn build_lots(count: usize) -> Vec<PurchaseLot> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            PurchaseLot::new(
                format!("PO-{:06}", i),
                "TEA".to_string(),
                format!("TEA-{}", i % 20),
                Decimal::from(10),
                Decimal::from(5 + (i % 7) as i64),
                start + chrono::Duration::days((count - i) as i64),
            )
            .with_prices(Decimal::from(20), Decimal::from(15))
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("fifo_allocate");

    for count in [100usize, 1_000, 10_000] {
        let lots = build_lots(count);
        let pending: Vec<PendingAllocationItem> = lots
            .iter()
            .step_by(3)
            .map(|lot| {
                PendingAllocationItem::new(lot.variant_id.clone(), lot.id.clone(), Decimal::from(4))
            })
            .collect();
        let demand = Decimal::from((count / 40) as i64 * 10);

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                FifoAllocator::allocate(black_box("TEA-3"), black_box(demand), &lots, &pending)
                    .unwrap()
            })
        });
    }

    group.finish();
}

fn bench_availability(c: &mut Criterion) {
    let lots = build_lots(10_000);

    c.bench_function("availability_10000", |b| {
        b.iter(|| AvailabilityCalculator::summarize(black_box(&lots), &[], BillingType::Retail))
    });
}

criterion_group!(benches, bench_allocate, bench_availability);
criterion_main!(benches);
