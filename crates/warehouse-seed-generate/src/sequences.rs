use serde::{Deserialize, Serialize};

/// Next identifier to hand out for each entity type.
///
/// Every counter starts at 1. After a run each value is one past the highest
/// id used, which is what the sequence-reset statements need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequences {
    pub shipments: i64,
    pub shipment_items: i64,
    pub returns: i64,
    pub return_items: i64,
}

impl Default for IdSequences {
    fn default() -> Self {
        Self {
            shipments: 1,
            shipment_items: 1,
            returns: 1,
            return_items: 1,
        }
    }
}

impl IdSequences {
    pub fn next_shipment(&mut self) -> i64 {
        advance(&mut self.shipments)
    }

    pub fn next_shipment_item(&mut self) -> i64 {
        advance(&mut self.shipment_items)
    }

    pub fn next_return(&mut self) -> i64 {
        advance(&mut self.returns)
    }

    pub fn next_return_item(&mut self) -> i64 {
        advance(&mut self.return_items)
    }

    /// `(sequence name, next value)` pairs in table order.
    pub fn entries(&self) -> [(&'static str, i64); 4] {
        [
            ("shipments_id_seq", self.shipments),
            ("shipment_items_id_seq", self.shipment_items),
            ("returns_id_seq", self.returns),
            ("return_items_id_seq", self.return_items),
        ]
    }
}

fn advance(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}
