//! Entity normalizer
//!
//! Translates raw gateway records into the shared domain models. The
//! gateway is inconsistent about field naming (custom fields carry a `_c`
//! suffix, system fields are PascalCase, older rows use plain camelCase)
//! and about reference fields (bare id vs expanded object), so every
//! lookup here takes a preference-ordered key list and every reference
//! resolves through [`RecordRef`]. Absent optionals become `None` or the
//! empty string; nothing in this module errors or panics.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use shared::{
    parse_tags, Category, Company, MovementDirection, Product, PurchaseOrder, PurchaseOrderItem,
    PurchaseOrderStatus, RecordRef, StockMovement, Supplier,
};

use crate::gateway::RawRecord;

/// First present, non-null text value among `keys`.
fn text(record: &RawRecord, keys: &[&str]) -> String {
    for key in keys {
        match record.get(*key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Null) | None => continue,
            Some(other) => return other.to_string().trim_matches('"').to_string(),
        }
    }
    String::new()
}

fn integer(record: &RawRecord, keys: &[&str]) -> i64 {
    opt_integer(record, keys).unwrap_or(0)
}

fn opt_integer(record: &RawRecord, keys: &[&str]) -> Option<i64> {
    for key in keys {
        match record.get(*key) {
            Some(Value::Number(n)) => return n.as_i64(),
            Some(Value::String(s)) => {
                if let Ok(parsed) = s.parse() {
                    return Some(parsed);
                }
            }
            _ => continue,
        }
    }
    None
}

fn decimal(record: &RawRecord, keys: &[&str]) -> Decimal {
    for key in keys {
        match record.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(parsed) = n.as_f64().and_then(|f| Decimal::try_from(f).ok()) {
                    return parsed;
                }
            }
            Some(Value::String(s)) => {
                if let Ok(parsed) = Decimal::from_str(s) {
                    return parsed;
                }
            }
            _ => continue,
        }
    }
    Decimal::ZERO
}

/// A reference field in either of its wire shapes.
fn reference(record: &RawRecord, keys: &[&str]) -> Option<RecordRef> {
    for key in keys {
        if let Some(value) = record.get(*key) {
            if value.is_null() {
                continue;
            }
            if let Ok(reference) = serde_json::from_value(value.clone()) {
                return Some(reference);
            }
        }
    }
    None
}

fn timestamp(record: &RawRecord, keys: &[&str]) -> Option<DateTime<Utc>> {
    for key in keys {
        if let Some(Value::String(s)) = record.get(*key) {
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Some(parsed.with_timezone(&Utc));
            }
        }
    }
    None
}

fn date(record: &RawRecord, keys: &[&str]) -> Option<NaiveDate> {
    for key in keys {
        if let Some(Value::String(s)) = record.get(*key) {
            if let Ok(parsed) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Some(parsed);
            }
            if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
                return Some(parsed.date_naive());
            }
        }
    }
    None
}

fn id(record: &RawRecord) -> i64 {
    integer(record, &["Id"])
}

pub fn product_from_record(record: &RawRecord) -> Product {
    Product {
        id: id(record),
        name: text(record, &["Name", "name"]),
        sku: text(record, &["sku_c", "sku"]),
        quantity: integer(record, &["quantity_c", "quantity"]),
        price: decimal(record, &["price_c", "price"]),
        category: reference(record, &["category_c"])
            .map(|r| r.display_or_id())
            .unwrap_or_else(|| text(record, &["category"])),
        min_stock: integer(record, &["min_stock_c", "minStock"]),
        description: text(record, &["description_c", "description"]),
        created_at: timestamp(record, &["CreatedOn", "createdAt"]),
        updated_at: timestamp(record, &["ModifiedOn", "updatedAt"]),
    }
}

pub fn category_from_record(record: &RawRecord) -> Category {
    Category {
        id: id(record),
        name: text(record, &["Name", "name"]),
        description: text(record, &["description_c", "description"]),
        parent_id: reference(record, &["parent_category_c"])
            .map(|r| r.id())
            .or_else(|| opt_integer(record, &["parentId"])),
        created_at: timestamp(record, &["CreatedOn", "createdAt"]),
        updated_at: timestamp(record, &["ModifiedOn", "updatedAt"]),
    }
}

pub fn movement_from_record(record: &RawRecord) -> StockMovement {
    StockMovement {
        id: id(record),
        product_id: reference(record, &["product_c"])
            .map(|r| r.id())
            .or_else(|| opt_integer(record, &["productId"]))
            .unwrap_or(0),
        direction: MovementDirection::parse(&text(record, &["direction_c", "type"]))
            .unwrap_or(MovementDirection::In),
        quantity: integer(record, &["quantity_c", "quantity"]),
        note: text(record, &["note_c", "note"]),
        timestamp: timestamp(record, &["timestamp_c", "timestamp", "CreatedOn"]),
    }
}

pub fn purchase_order_from_record(record: &RawRecord) -> PurchaseOrder {
    let supplier = reference(record, &["supplier_c"]);
    PurchaseOrder {
        id: id(record),
        name: text(record, &["Name", "name"]),
        number: text(record, &["purchase_order_number_c"]),
        supplier_id: supplier.as_ref().map(|r| r.id()),
        supplier_name: supplier.map(|r| r.display_or_id()).unwrap_or_default(),
        order_date: date(record, &["order_date_c"]),
        expected_delivery_date: date(record, &["expected_delivery_date_c"]),
        status: PurchaseOrderStatus::parse(&text(record, &["purchase_order_status_c"]))
            .unwrap_or(PurchaseOrderStatus::Draft),
        reference_number: text(record, &["reference_number_c"]),
        payment_terms: text(record, &["payment_terms_c"]),
        currency: text(record, &["currency_c"]),
    }
}

pub fn purchase_order_item_from_record(record: &RawRecord) -> PurchaseOrderItem {
    PurchaseOrderItem {
        id: id(record),
        purchase_order_id: reference(record, &["purchase_order_c"])
            .map(|r| r.id())
            .unwrap_or(0),
        product_id: reference(record, &["product_c"]).map(|r| r.id()),
        name: text(record, &["Name", "name"]),
        description: text(record, &["description_c", "description"]),
        quantity_ordered: decimal(record, &["quantity_ordered_c"]),
        unit_price: decimal(record, &["unit_price_c"]),
        tax_percentage: decimal(record, &["tax_percentage_c"]),
        discount_percentage: decimal(record, &["discount_percentage_c"]),
        line_total: decimal(record, &["line_total_c"]),
    }
}

pub fn supplier_from_record(record: &RawRecord) -> Supplier {
    Supplier {
        id: id(record),
        name: text(record, &["Name", "name"]),
        contact_person: text(record, &["contact_person_c", "contactPerson"]),
        email: text(record, &["email_c", "email"]),
        phone: text(record, &["phone_c", "phone"]),
        address: text(record, &["address_c", "address"]),
        tags: parse_tags(&text(record, &["Tags"])),
        created_at: timestamp(record, &["CreatedOn", "createdAt"]),
        updated_at: timestamp(record, &["ModifiedOn", "updatedAt"]),
    }
}

pub fn company_from_record(record: &RawRecord) -> Company {
    let supplier = reference(record, &["supplier_c"]);
    Company {
        id: id(record),
        name: text(record, &["Name", "name"]),
        contact_information: text(record, &["contactInformation_c"]),
        address: text(record, &["address_c", "address"]),
        email: text(record, &["email_c", "email"]),
        phone: text(record, &["phone_c", "phone"]),
        supplier_id: supplier.as_ref().map(|r| r.id()),
        supplier_name: supplier
            .and_then(|r| r.display_name().map(|n| n.to_string()))
            .unwrap_or_default(),
        tags: parse_tags(&text(record, &["Tags"])),
        created_at: timestamp(record, &["CreatedOn", "createdAt"]),
        updated_at: timestamp(record, &["ModifiedOn", "updatedAt"]),
    }
}
