//! Payment-type fallback
//!
//! Maps the numeric payment-type code carried by a payment term straight to a
//! bank, for terms without a usable bank name.

use crate::catalog::BankCatalog;
use crate::PaymentMethodEntry;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PaymentMethodTable {
    by_type: HashMap<u32, PaymentMethodEntry>,
}

impl PaymentMethodTable {
    pub fn new(catalog: &BankCatalog) -> Self {
        let by_type = catalog
            .payment_methods()
            .iter()
            .map(|method| (method.payment_type, method.clone()))
            .collect();
        Self { by_type }
    }

    /// Entry for a payment-type code; unknown codes yield `None`
    pub fn find_payment_method_by_type(&self, payment_type: u32) -> Option<&PaymentMethodEntry> {
        self.by_type.get(&payment_type)
    }

    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
