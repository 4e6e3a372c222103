//! Payment batch example
//!
//! Builds payment instructions for a batch of P2P orders. Orders whose bank
//! cannot be resolved are skipped rather than guessed.

use bank_code_resolver::{BankResolver, PayOrder, PaymentInstructionBuilder};
use tracing_subscriber::EnvFilter;

const ORDERS: &str = r#"[
    {
        "orderId": "P2P-0001",
        "amount": 45000.0,
        "currency": "NGN",
        "paymentTerm": {"bankName": "GTBank", "accountNo": "0123456789", "realName": "ADA OBI"}
    },
    {
        "orderId": "P2P-0002",
        "amount": 12500.0,
        "currency": "NGN",
        "paymentTerm": {"paymentType": 500, "accountNo": "201-234-5678", "realName": "TUNDE BELLO"}
    },
    {
        "orderId": "P2P-0003",
        "amount": 8000.0,
        "currency": "NGN",
        "paymentTerm": {"bankName": "Bank", "accountNo": "3012345678", "realName": "NGOZI EZE"}
    },
    {
        "orderId": "P2P-0004",
        "amount": 99000.0,
        "currency": "NGN",
        "paymentTerm": {"bankName": "Zenith Bank", "accountNo": "12345", "realName": "EMEKA UDO"}
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Payment Instruction Batch ===\n");

    let resolver = BankResolver::builtin()?;
    let orders: Vec<PayOrder> = serde_json::from_str(ORDERS)?;
    let batch = PaymentInstructionBuilder::new(&resolver).build_batch(&orders);

    println!("1. Instructions ({})", batch.instructions.len());
    for instruction in &batch.instructions {
        println!(
            "   {} -> {} {} ({}) {:.2} {}",
            instruction.order_id,
            instruction.bank_code,
            instruction.bank_name,
            instruction.match_kind,
            instruction.amount,
            instruction.currency
        );
    }
    println!();

    println!("2. Skipped ({})", batch.skipped.len());
    for skipped in &batch.skipped {
        println!("   {} -> {}", skipped.order_id, skipped.reason);
    }
    println!();

    println!("3. JSON Export");
    println!("{}", batch.to_json()?);

    Ok(())
}
