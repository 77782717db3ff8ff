//! Generates Kotlin and Swift bindings for the `bioauth` library.

fn main() {
    uniffi::uniffi_bindgen_main();
}
