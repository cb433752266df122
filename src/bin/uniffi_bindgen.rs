//! UniFFI bindgen CLI tool for generating language bindings.
//!
//! Generates Swift, Kotlin, Python, and Ruby bindings for the recipe-book
//! service from the compiled library.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features cli --bin uniffi-bindgen generate --library target/release/librecipe_book.so --language kotlin --out-dir ./bindings
//! ```

fn main() {
    uniffi::uniffi_bindgen_main()
}
