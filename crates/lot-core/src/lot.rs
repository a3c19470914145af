//! 採購批次模型

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::BillingType;
use crate::{CostingError, Result};

/// 採購批次
///
/// 每次進貨建立一筆批次，`remaining_quantity` 只會在外部提交步驟中遞減。
/// 曾經有過庫存的批次不會被刪除（保留稽核紀錄）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLot {
    /// 批次ID（即採購單ID）
    pub id: String,

    /// 商品ID
    pub product_id: String,

    /// 規格ID
    pub variant_id: String,

    /// 供應商
    pub supplier: Option<String>,

    /// 進貨數量
    pub quantity_received: Decimal,

    /// 剩餘數量（已持久化）
    pub remaining_quantity: Decimal,

    /// 單位成本
    pub unit_cost: Decimal,

    /// 零售價
    pub retail_price: Decimal,

    /// 批發價
    pub wholesale_price: Decimal,

    /// 運費
    pub shipping_cost: Decimal,

    /// 進貨日期
    pub purchase_date: NaiveDate,

    /// 倉庫/地點
    pub location_id: Option<String>,
}

impl PurchaseLot {
    /// 創建新的採購批次（剩餘數量預設等於進貨數量）
    pub fn new(
        id: String,
        product_id: String,
        variant_id: String,
        quantity_received: Decimal,
        unit_cost: Decimal,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            product_id,
            variant_id,
            supplier: None,
            quantity_received,
            remaining_quantity: quantity_received,
            unit_cost,
            retail_price: Decimal::ZERO,
            wholesale_price: Decimal::ZERO,
            shipping_cost: Decimal::ZERO,
            purchase_date,
            location_id: None,
        }
    }

    /// 建構器模式：設置剩餘數量
    pub fn with_remaining_quantity(mut self, remaining: Decimal) -> Self {
        self.remaining_quantity = remaining;
        self
    }

    /// 建構器模式：設置零售價與批發價
    pub fn with_prices(mut self, retail_price: Decimal, wholesale_price: Decimal) -> Self {
        self.retail_price = retail_price;
        self.wholesale_price = wholesale_price;
        self
    }

    /// 建構器模式：設置供應商
    pub fn with_supplier(mut self, supplier: String) -> Self {
        self.supplier = Some(supplier);
        self
    }

    /// 建構器模式：設置運費
    pub fn with_shipping_cost(mut self, shipping_cost: Decimal) -> Self {
        self.shipping_cost = shipping_cost;
        self
    }

    /// 建構器模式：設置倉庫
    pub fn with_location_id(mut self, location_id: String) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// 依計價類型取得售價
    pub fn price_for(&self, billing_type: BillingType) -> Decimal {
        match billing_type {
            BillingType::Retail => self.retail_price,
            BillingType::Wholesale => self.wholesale_price,
        }
    }

    /// 檢查持久化剩餘數量是否已用完
    pub fn is_exhausted(&self) -> bool {
        self.remaining_quantity <= Decimal::ZERO
    }

    /// FIFO 排序：進貨日期升冪，同日以批次ID升冪
    pub fn fifo_cmp(&self, other: &Self) -> Ordering {
        self.purchase_date
            .cmp(&other.purchase_date)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// 驗證 `0 ≤ remaining_quantity ≤ quantity_received`
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(CostingError::InvalidLot("批次ID不可為空".to_string()));
        }
        if self.variant_id.trim().is_empty() {
            return Err(CostingError::InvalidLot(format!("批次 {} 缺少規格ID", self.id)));
        }
        if self.remaining_quantity < Decimal::ZERO
            || self.remaining_quantity > self.quantity_received
        {
            return Err(CostingError::InvalidLot(format!(
                "批次 {} 剩餘數量 {} 超出範圍 [0, {}]",
                self.id, self.remaining_quantity, self.quantity_received
            )));
        }
        if self.unit_cost < Decimal::ZERO {
            return Err(CostingError::InvalidLot(format!(
                "批次 {} 單位成本為負: {}",
                self.id, self.unit_cost
            )));
        }
        Ok(())
    }
}

/// 批次快照（由呼叫端提供，唯讀）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LotSnapshot {
    lots: Vec<PurchaseLot>,
}

impl LotSnapshot {
    /// 從批次列表創建快照，逐筆驗證
    ///
    /// 批次ID必須唯一，待提交佔用以批次ID對應。
    pub fn new(lots: Vec<PurchaseLot>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(lots.len());
        for lot in &lots {
            lot.validate()?;
            if !seen.insert(lot.id.as_str()) {
                return Err(CostingError::InvalidLot(format!("批次ID重複: {}", lot.id)));
            }
        }
        Ok(Self { lots })
    }

    pub fn lots(&self) -> &[PurchaseLot] {
        &self.lots
    }

    /// 取得指定規格的批次
    pub fn for_variant<'a>(&'a self, variant_id: &'a str) -> impl Iterator<Item = &'a PurchaseLot> {
        self.lots.iter().filter(move |lot| lot.variant_id == variant_id)
    }

    /// 依ID查找批次
    pub fn find(&self, lot_id: &str) -> Option<&PurchaseLot> {
        self.lots.iter().find(|lot| lot.id == lot_id)
    }

    /// 快照中所有規格ID（排序、去重）
    pub fn variant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lots.iter().map(|lot| lot.variant_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }
}
