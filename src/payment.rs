//! Payment instruction construction
//!
//! Turns P2P pay orders into payment instructions. An order whose bank cannot
//! be resolved is skipped and logged, never guessed.

use crate::resolver::{BankResolver, PaymentTerm};
use crate::{BankCode, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// 10-digit NUBAN, optionally grouped 3-3-4 with spaces or dashes
const ACCOUNT_NUMBER_PATTERN: &str = r"^\s*(\d{3})[\s-]?(\d{3})[\s-]?(\d{4})\s*$";

fn account_number_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(ACCOUNT_NUMBER_PATTERN).expect("account number pattern compiles"))
}

/// Payment construction errors
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaymentError {
    #[error("Bank could not be resolved for order {order_id}: {bank_name:?}")]
    UnresolvedBank {
        order_id: String,
        bank_name: Option<String>,
    },

    #[error("Invalid account number: {0}")]
    InvalidAccount(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Order awaiting payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOrder {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    pub payment_term: PaymentTerm,
}

/// Instruction ready for submission to the payment API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    pub order_id: String,
    pub bank_code: BankCode,
    pub bank_name: String,
    pub account_number: String,
    pub account_name: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub match_kind: MatchKind,
}

impl PaymentInstruction {
    /// Export as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Order left out of a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedOrder {
    pub order_id: String,
    pub reason: PaymentError,
}

/// Result of building a batch of orders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentBatch {
    pub instructions: Vec<PaymentInstruction>,
    pub skipped: Vec<SkippedOrder>,
}

impl PaymentBatch {
    /// Whether every order produced an instruction
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Sum of instruction amounts
    pub fn total_amount(&self) -> f64 {
        self.instructions.iter().map(|i| i.amount).sum()
    }

    /// Export as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds payment instructions using the strict resolution policy
pub struct PaymentInstructionBuilder<'a> {
    resolver: &'a BankResolver,
}

impl<'a> PaymentInstructionBuilder<'a> {
    pub fn new(resolver: &'a BankResolver) -> Self {
        Self { resolver }
    }

    /// Build the instruction for one order
    pub fn build(&self, order: &PayOrder) -> Result<PaymentInstruction, PaymentError> {
        validate_amount(order.amount)?;
        let account_number = parse_account_number(order.payment_term.account_no.as_deref())?;

        let resolution = self
            .resolver
            .resolve_payment_term(&order.payment_term)
            .ok_or_else(|| PaymentError::UnresolvedBank {
                order_id: order.order_id.clone(),
                bank_name: order.payment_term.bank_name.clone(),
            })?;

        debug!(
            order_id = %order.order_id,
            code = %resolution.bank.code,
            kind = %resolution.kind,
            "payment instruction built"
        );

        Ok(PaymentInstruction {
            order_id: order.order_id.clone(),
            bank_code: resolution.bank.code,
            bank_name: resolution.bank.name,
            account_number,
            account_name: order.payment_term.real_name.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            match_kind: resolution.kind,
        })
    }

    /// Build instructions for many orders, skipping the ones that fail
    pub fn build_batch(&self, orders: &[PayOrder]) -> PaymentBatch {
        let mut batch = PaymentBatch::default();
        for order in orders {
            match self.build(order) {
                Ok(instruction) => batch.instructions.push(instruction),
                Err(reason) => {
                    warn!(order_id = %order.order_id, %reason, "order skipped");
                    batch.skipped.push(SkippedOrder {
                        order_id: order.order_id.clone(),
                        reason,
                    });
                }
            }
        }
        batch
    }
}

fn validate_amount(amount: f64) -> Result<(), PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

/// Canonical 10-digit account number
fn parse_account_number(raw: Option<&str>) -> Result<String, PaymentError> {
    let raw = raw.unwrap_or_default();
    let captures = account_number_regex()
        .captures(raw)
        .ok_or_else(|| PaymentError::InvalidAccount(raw.to_string()))?;

    Ok(format!("{}{}{}", &captures[1], &captures[2], &captures[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BankResolver {
        BankResolver::builtin().unwrap()
    }

    fn order(order_id: &str, bank_name: Option<&str>, payment_type: Option<u32>) -> PayOrder {
        PayOrder {
            order_id: order_id.to_string(),
            amount: 25_000.0,
            currency: "NGN".to_string(),
            payment_term: PaymentTerm {
                bank_name: bank_name.map(str::to_string),
                branch_name: None,
                payment_type,
                account_no: Some("0123456789".to_string()),
                real_name: Some("ADA OBI".to_string()),
            },
        }
    }

    #[test]
    fn test_build_instruction() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        let instruction = builder.build(&order("ORD-001", Some("GTBank"), None)).unwrap();
        assert_eq!(instruction.bank_code.as_str(), "000013");
        assert_eq!(instruction.bank_name, "Guaranty Trust Bank");
        assert_eq!(instruction.account_number, "0123456789");
        assert_eq!(instruction.match_kind, MatchKind::Alias);
    }

    #[test]
    fn test_build_from_payment_type() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        let instruction = builder.build(&order("ORD-002", None, Some(500))).unwrap();
        assert_eq!(instruction.bank_code.as_str(), "090267");
        assert_eq!(instruction.match_kind, MatchKind::PaymentType);
    }

    #[test]
    fn test_unresolved_bank() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        let err = builder
            .build(&order("ORD-003", Some("xyz-nonexistent-bank"), None))
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::UnresolvedBank {
                order_id: "ORD-003".to_string(),
                bank_name: Some("xyz-nonexistent-bank".to_string()),
            }
        );
    }

    #[test]
    fn test_unresolved_bank_name_not_rerouted_by_payment_type() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        let err = builder
            .build(&order("ORD-007", Some("Zenith Bank PLC"), Some(500)))
            .unwrap_err();
        assert_eq!(
            err,
            PaymentError::UnresolvedBank {
                order_id: "ORD-007".to_string(),
                bank_name: Some("Zenith Bank PLC".to_string()),
            }
        );
    }

    #[test]
    fn test_invalid_amount() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        for amount in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut pay_order = order("ORD-004", Some("GTBank"), None);
            pay_order.amount = amount;
            assert!(matches!(
                builder.build(&pay_order),
                Err(PaymentError::InvalidAmount(_))
            ));
        }
    }

    #[test]
    fn test_account_number_formats() {
        assert_eq!(parse_account_number(Some("0123456789")).unwrap(), "0123456789");
        assert_eq!(parse_account_number(Some("012-345-6789")).unwrap(), "0123456789");
        assert_eq!(parse_account_number(Some(" 012 345 6789 ")).unwrap(), "0123456789");
    }

    #[test]
    fn test_invalid_account_number() {
        for raw in [None, Some(""), Some("12345"), Some("01234567890"), Some("01234abcde")] {
            assert!(matches!(
                parse_account_number(raw),
                Err(PaymentError::InvalidAccount(_))
            ));
        }
    }

    #[test]
    fn test_build_batch_skips_failures() {
        let resolver = resolver();
        let builder = PaymentInstructionBuilder::new(&resolver);

        let orders = vec![
            order("ORD-010", Some("Zenith Bank"), None),
            order("ORD-011", Some("bank"), None),
            order("ORD-012", Some("kudabank"), None),
        ];
        let batch = builder.build_batch(&orders);

        assert_eq!(batch.instructions.len(), 2);
        assert_eq!(batch.skipped.len(), 1);
        assert_eq!(batch.skipped[0].order_id, "ORD-011");
        assert!(!batch.is_complete());
        assert_eq!(batch.total_amount(), 50_000.0);
    }

    #[test]
    fn test_order_wire_format() {
        let json = r#"{
            "orderId": "ORD-020",
            "amount": 1500.5,
            "currency": "NGN",
            "paymentTerm": {"bankName": "Kuda", "accountNo": "0123456789", "realName": "ADA OBI"}
        }"#;
        let pay_order: PayOrder = serde_json::from_str(json).unwrap();
        let resolver = resolver();
        let instruction = PaymentInstructionBuilder::new(&resolver)
            .build(&pay_order)
            .unwrap();

        assert_eq!(instruction.bank_code.as_str(), "090267");
        let exported = instruction.to_json().unwrap();
        assert!(exported.contains("\"bank_code\": \"090267\""));
        assert!(exported.contains("ORD-020"));
    }
}
