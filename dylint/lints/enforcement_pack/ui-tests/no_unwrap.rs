// Test case for NO_UNWRAP lint

fn bad_unwrap(text: &str) -> u64 {
    text.parse().unwrap()
}

fn bad_expect(text: &str) -> u64 {
    text.parse().expect("durationMs is numeric")
}

// Good: the error is propagated
fn good_propagate(text: &str) -> Result<u64, std::num::ParseIntError> {
    text.parse()
}


fn main() {
    bad_unwrap("78");
    bad_expect("78");
    let _ = good_propagate("78");
}
