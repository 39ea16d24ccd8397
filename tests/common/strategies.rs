use proptest::prelude::*;

/// Strategy for generating plain metric segments (no delimiters)
pub fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,15}"
}

/// Strategy for generating optional segments, including empty ones
pub fn optional_segment_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        3 => segment_strategy(),
        1 => Just(String::new()),
    ])
}

/// Strategy for generating namespaced worker class names like `Billing::InvoiceJob`
pub fn worker_class_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Z][a-zA-Z0-9]{0,11}", 1..4).prop_map(|parts| parts.join("::"))
}

/// Strategy for generating queue names
pub fn queue_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}
