//! Bank name resolution example
//!
//! Resolves counterparty bank names under both policies and shows which stage
//! produced each result.
//!
//! Run with `RUST_LOG=bank_code_resolver=debug` to see every stage decision.

use bank_code_resolver::{BankResolver, MatchStrictness, PaymentTerm};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bank Code Resolver ===\n");

    let resolver = BankResolver::builtin()?;
    println!("Catalog: {} banks", resolver.catalog().len());
    println!("Fingerprint: {}\n", resolver.catalog().fingerprint());

    let inputs = [
        "Guaranty Trust Bank",
        "GTB",
        "kudabank",
        "Sterling Bank Plc",
        "Access Bank Plc",
        "Guaranty Trust B",
        "First",
        "bank",
        "xyz-nonexistent-bank",
        "",
    ];

    for (step, strictness) in [MatchStrictness::Loose, MatchStrictness::Strict]
        .into_iter()
        .enumerate()
    {
        println!("{}. Resolving with the {} policy", step + 1, strictness);
        for input in inputs {
            match resolver.resolve(input, strictness) {
                Some(found) => println!(
                    "   {:<24} -> {} ({}) via {}",
                    format!("{:?}", input),
                    found.bank.name,
                    found.bank.code,
                    found.kind
                ),
                None => println!("   {:<24} -> no match", format!("{:?}", input)),
            }
        }
        println!();
    }

    println!("3. Payment-Type Fallback");
    let term = PaymentTerm {
        bank_name: None,
        payment_type: Some(500),
        ..PaymentTerm::default()
    };
    match resolver.resolve_payment_term(&term) {
        Some(found) => println!("   Payment type 500 -> {}", found.bank.to_json()?),
        None => println!("   Payment type 500 -> no match"),
    }

    Ok(())
}
