//! Purchase order models and line-item financial rollups

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Purchase order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "Draft",
            PurchaseOrderStatus::Sent => "Sent",
            PurchaseOrderStatus::Received => "Received",
            PurchaseOrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Draft" => Some(PurchaseOrderStatus::Draft),
            "Sent" => Some(PurchaseOrderStatus::Sent),
            "Received" => Some(PurchaseOrderStatus::Received),
            "Cancelled" => Some(PurchaseOrderStatus::Cancelled),
            _ => None,
        }
    }
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A purchase order header. The supplier reference is resolved to a display
/// name by the entity normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub name: String,
    pub number: String,
    pub supplier_id: Option<i64>,
    pub supplier_name: String,
    pub order_date: Option<NaiveDate>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: PurchaseOrderStatus,
    pub reference_number: String,
    pub payment_terms: String,
    pub currency: String,
}

/// A purchase order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    pub id: i64,
    pub purchase_order_id: i64,
    pub product_id: Option<i64>,
    pub name: String,
    pub description: String,
    pub quantity_ordered: Decimal,
    pub unit_price: Decimal,
    pub tax_percentage: Decimal,
    pub discount_percentage: Decimal,
    pub line_total: Decimal,
}

/// Financial rollup for a single line item: discount applies to the
/// subtotal, tax applies after the discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub after_discount: Decimal,
    pub tax_amount: Decimal,
    pub line_total: Decimal,
}

impl LineItemTotals {
    /// Recomputed whenever quantity, unit price, tax % or discount %
    /// changes. The stored/displayed line total rounds half-up to 2dp.
    pub fn compute(
        quantity: Decimal,
        unit_price: Decimal,
        tax_percentage: Decimal,
        discount_percentage: Decimal,
    ) -> Self {
        let hundred = Decimal::from(100);
        let subtotal = quantity * unit_price;
        let discount_amount = subtotal * (discount_percentage / hundred);
        let after_discount = subtotal - discount_amount;
        let tax_amount = after_discount * (tax_percentage / hundred);
        let line_total = (after_discount + tax_amount)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            discount_amount,
            after_discount,
            tax_amount,
            line_total,
        }
    }
}

/// Order-level subtotal over all line items currently attached to the order.
pub fn order_subtotal(items: &[PurchaseOrderItem]) -> Decimal {
    items.iter().map(|item| item.line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_line_total_with_tax_and_discount() {
        let totals = LineItemTotals::compute(dec("2"), dec("50.00"), dec("10"), dec("20"));
        assert_eq!(totals.subtotal, dec("100.00"));
        assert_eq!(totals.discount_amount, dec("20.00"));
        assert_eq!(totals.after_discount, dec("80.00"));
        assert_eq!(totals.tax_amount, dec("8.00"));
        assert_eq!(totals.line_total, dec("88.00"));
    }

    #[test]
    fn test_line_total_no_tax_no_discount() {
        let totals = LineItemTotals::compute(dec("3"), dec("9.99"), Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.line_total, dec("29.97"));
    }

    #[test]
    fn test_line_total_rounds_to_two_decimals() {
        // 3 * 0.333 = 0.999 -> 1.00 after 7% tax is 1.06893 -> 1.07
        let totals = LineItemTotals::compute(dec("3"), dec("0.333"), dec("7"), Decimal::ZERO);
        assert_eq!(totals.line_total, dec("1.07"));
    }

    #[test]
    fn test_zero_quantity_zero_total() {
        let totals = LineItemTotals::compute(Decimal::ZERO, dec("50"), dec("10"), dec("20"));
        assert_eq!(totals.line_total, Decimal::ZERO.round_dp(2));
    }

    #[test]
    fn test_order_subtotal() {
        let item = |line_total: &str| PurchaseOrderItem {
            id: 0,
            purchase_order_id: 1,
            product_id: None,
            name: String::new(),
            description: String::new(),
            quantity_ordered: Decimal::ONE,
            unit_price: Decimal::ZERO,
            tax_percentage: Decimal::ZERO,
            discount_percentage: Decimal::ZERO,
            line_total: dec(line_total),
        };
        let items = vec![item("88.00"), item("29.97")];
        assert_eq!(order_subtotal(&items), dec("117.97"));
        assert_eq!(order_subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            PurchaseOrderStatus::Draft,
            PurchaseOrderStatus::Sent,
            PurchaseOrderStatus::Received,
            PurchaseOrderStatus::Cancelled,
        ] {
            assert_eq!(PurchaseOrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseOrderStatus::parse("Pending"), None);
    }
}
