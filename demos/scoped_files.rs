//! Scoped Files Example
//!
//! Demonstrates resource stacks managing real temp files.
//! Every file pushed onto the stack is removed when the stack unwinds,
//! in reverse creation order, even when the work in between fails.
//!
//! Shows practical patterns including:
//! - Attaching already-created files with their cleanup actions
//! - LIFO cleanup order across several files
//! - The `scoped` runner for guaranteed cleanup on failure
//! - Nested scopes bounding sub-lifetimes within one stack

use std::path::PathBuf;

use undertow::ResourceStack;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("undertow_demo_{}.txt", name))
}

fn create(name: &str) -> Result<PathBuf, String> {
    let path = temp_path(name);
    std::fs::write(&path, name).map_err(|e| e.to_string())?;
    println!("  created {:?}", path);
    Ok(path)
}

fn remove(path: PathBuf) -> Result<(), String> {
    println!("  removed {:?}", path);
    std::fs::remove_file(&path).map_err(|e| e.to_string())
}

// ==================== LIFO Cleanup ====================

/// Example 1: files are removed in reverse creation order.
fn example_lifo_cleanup() -> Result<(), String> {
    println!("\n=== Example 1: LIFO Cleanup ===");

    let mut stack = ResourceStack::<PathBuf, String>::new();
    for name in ["first", "second", "third"] {
        let path = create(name)?;
        stack.attach(path, remove).map_err(|e| e.to_string())?;
    }

    println!("  {} files on the stack", stack.len());
    match stack.unwind() {
        Ok(()) => println!("  all removed, third first"),
        Err(err) => println!("  cleanup trouble: {}", err),
    }
    Ok(())
}

// ==================== Guaranteed Cleanup on Failure ====================

/// Example 2: the scoped runner cleans up even when the body fails.
fn example_scoped_failure() {
    println!("\n=== Example 2: Cleanup on Body Failure ===");

    let result: Result<(), _> = ResourceStack::scoped(|stack| {
        let path = create("doomed")?;
        stack.attach(path, remove).map_err(|e| e.to_string())?;
        Err("work went sideways".to_string())
    });

    match result {
        Err(err) => {
            println!("  body failure stays primary: {}", err);
            println!(
                "  release failures chained: {}",
                err.release_failures().len()
            );
        }
        Ok(()) => println!("  unexpected success"),
    }
    assert!(!temp_path("doomed").exists());
}

// ==================== Nested Scopes ====================

/// Example 3: a nested scope releases only its own files.
fn example_nested_scope() -> Result<(), String> {
    println!("\n=== Example 3: Nested Scopes ===");

    let mut stack = ResourceStack::<PathBuf, String>::new();
    let outer = create("outer")?;
    stack.attach(outer.clone(), remove).map_err(|e| e.to_string())?;

    {
        let mut scope = stack.scope();
        let inner = create("inner")?;
        scope.attach(inner, remove).map_err(|e| e.to_string())?;
        println!("  inside scope: {} entries", scope.len());
        scope.close().map_err(|e| e.to_string())?;
    }

    println!(
        "  after scope: {} entries, outer file exists: {}",
        stack.len(),
        outer.exists()
    );
    stack.unwind().map_err(|e| e.to_string())?;
    Ok(())
}

// ==================== Main ====================

fn main() {
    println!("Scoped Files Examples");
    println!("=====================");

    if let Err(err) = example_lifo_cleanup() {
        eprintln!("example 1 failed: {}", err);
    }
    example_scoped_failure();
    if let Err(err) = example_nested_scope() {
        eprintln!("example 3 failed: {}", err);
    }

    println!("\n=== All examples completed! ===");
}
