use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Lifecycle status of a shipment, stored with its Italian database label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipmentStatus {
    /// Created but not yet handed to a driver (`BOZZA`).
    Draft,
    /// Out for delivery (`IN_CONSEGNA`).
    InTransit,
    /// Delivered to the shop (`CONSEGNATA`).
    Delivered,
}

impl ShipmentStatus {
    pub const ALL: [ShipmentStatus; 3] = [
        ShipmentStatus::Draft,
        ShipmentStatus::InTransit,
        ShipmentStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Draft => "BOZZA",
            ShipmentStatus::InTransit => "IN_CONSEGNA",
            ShipmentStatus::Delivered => "CONSEGNATA",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnStatus {
    Pending,
    Approved,
    Processed,
}

impl ReturnStatus {
    pub const ALL: [ReturnStatus; 3] = [
        ReturnStatus::Pending,
        ReturnStatus::Approved,
        ReturnStatus::Processed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnStatus::Pending => "PENDING",
            ReturnStatus::Approved => "APPROVED",
            ReturnStatus::Processed => "PROCESSED",
        }
    }
}

/// Reason attached to a return and to each of its line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnReason {
    Damaged,
    Expired,
    WrongProduct,
    ExcessQuantity,
    QualityIssue,
    Other,
}

impl ReturnReason {
    pub const ALL: [ReturnReason; 6] = [
        ReturnReason::Damaged,
        ReturnReason::Expired,
        ReturnReason::WrongProduct,
        ReturnReason::ExcessQuantity,
        ReturnReason::QualityIssue,
        ReturnReason::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnReason::Damaged => "DAMAGED",
            ReturnReason::Expired => "EXPIRED",
            ReturnReason::WrongProduct => "WRONG_PRODUCT",
            ReturnReason::ExcessQuantity => "EXCESS_QUANTITY",
            ReturnReason::QualityIssue => "QUALITY_ISSUE",
            ReturnReason::Other => "OTHER",
        }
    }
}

/// A delivery from the warehouse to a shop.
#[derive(Debug, Clone, PartialEq)]
pub struct Shipment {
    pub id: i64,
    pub shipment_number: String,
    pub shop_id: i64,
    pub driver_id: i64,
    pub shipment_date: NaiveDate,
    pub status: ShipmentStatus,
    pub notes: String,
    pub email_sent: bool,
    pub whatsapp_sent: bool,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentItem {
    pub id: i64,
    pub shipment_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// Goods sent back by a shop after a delivered shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub id: i64,
    pub return_number: String,
    pub shipment_id: i64,
    pub shop_id: i64,
    pub return_date: NaiveDate,
    pub status: ReturnStatus,
    pub reason: ReturnReason,
    pub created_by: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
    pub id: i64,
    pub return_id: i64,
    pub shipment_item_id: i64,
    pub product_id: i64,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub reason: ReturnReason,
}

/// Every record produced by one generation run, in generation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub shipments: Vec<Shipment>,
    pub shipment_items: Vec<ShipmentItem>,
    pub returns: Vec<Return>,
    pub return_items: Vec<ReturnItem>,
}

impl Dataset {
    /// Shipments are stored with ids 1..=N, so the id doubles as an index.
    pub fn shipment(&self, id: i64) -> Option<&Shipment> {
        id.checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.shipments.get(index))
            .filter(|shipment| shipment.id == id)
    }

    pub fn items_of(&self, shipment_id: i64) -> impl Iterator<Item = &ShipmentItem> {
        self.shipment_items
            .iter()
            .filter(move |item| item.shipment_id == shipment_id)
    }

    pub fn items_of_return(&self, return_id: i64) -> impl Iterator<Item = &ReturnItem> {
        self.return_items
            .iter()
            .filter(move |item| item.return_id == return_id)
    }
}
