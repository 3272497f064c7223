// Test case for NO_PRINTLN lint

fn bad_println() {
    println!("Found 3 audit record(s)");
}

fn bad_eprintln() {
    eprintln!("item 1: decode error (malformed json)");
}

fn bad_dbg() {
    let payload = "[]";
    dbg!(payload);
}

// Good: using tracing
fn good_tracing() {
    tracing::info!(batch_id = "b1", "Found 3 audit record(s)");
}

fn main() {
    bad_println();
    bad_eprintln();
    bad_dbg();
    good_tracing();
}
