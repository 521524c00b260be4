//! Transaction Example
//!
//! Demonstrates exit strategies that observe the in-flight failure:
//! a transactional resource commits when the scope body succeeds and
//! rolls back when it fails. Also shows the drop-path warning emitted
//! when a stack is dropped with failing releases.
//!
//! Run with: cargo run --example transaction --features tracing

use undertow::{ResourceStack, Scoped};

/// A pretend transaction. `exit` sees whether the body failed.
struct Transaction {
    id: u32,
}

/// The open transaction recorded on the stack.
struct OpenTransaction {
    id: u32,
}

impl Scoped for Transaction {
    type Value = OpenTransaction;
    type Error = String;

    fn enter(self) -> Result<OpenTransaction, String> {
        println!("  begin tx {}", self.id);
        Ok(OpenTransaction { id: self.id })
    }

    fn exit(tx: OpenTransaction, failure: Option<&String>) -> Result<(), String> {
        match failure {
            Some(cause) => println!("  rollback tx {} (cause: {})", tx.id, cause),
            None => println!("  commit tx {}", tx.id),
        }
        Ok(())
    }
}

fn main() {
    tracing_subscriber::fmt().init();

    println!("Transaction Examples");
    println!("====================");

    println!("\n=== Clean body: transactions commit ===");
    let result = ResourceStack::scoped(|stack| {
        stack.enter(Transaction { id: 1 }).map_err(|e| e.to_string())?;
        stack.enter(Transaction { id: 2 }).map_err(|e| e.to_string())?;
        println!("  doing work with {} open transactions", stack.len());
        Ok("done")
    });
    println!("  result: {:?}", result);

    println!("\n=== Failing body: transactions roll back, LIFO ===");
    let result: Result<(), _> = ResourceStack::scoped(|stack| {
        stack.enter(Transaction { id: 3 }).map_err(|e| e.to_string())?;
        stack.enter(Transaction { id: 4 }).map_err(|e| e.to_string())?;
        Err("constraint violated".to_string())
    });
    match result {
        Err(err) => println!("  caller sees: {}", err),
        Ok(()) => println!("  unexpected success"),
    }

    println!("\n=== Drop path: failing releases get logged, not lost ===");
    {
        let mut stack = ResourceStack::<&str, String>::new();
        stack
            .attach("flaky", |name| Err(format!("{} refused to close", name)))
            .unwrap();
        // dropped without an explicit unwind: a warning is traced
    }

    println!("\n=== All examples completed! ===");
}
