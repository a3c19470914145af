//! 待提交佔用模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 編輯中單據已暫時佔用的批次數量（尚未提交）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAllocationItem {
    /// 規格ID
    pub variant_id: String,

    /// 批次ID
    pub lot_id: String,

    /// 佔用數量
    pub quantity: Decimal,
}

impl PendingAllocationItem {
    pub fn new(variant_id: String, lot_id: String, quantity: Decimal) -> Self {
        Self {
            variant_id,
            lot_id,
            quantity,
        }
    }
}
