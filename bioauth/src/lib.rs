//! Binding crate for `bioauth`.
//!
//! Re-exports `bioauth-core` and its `UniFFI` scaffolding so a single
//! `cdylib`/`staticlib` can be handed to the Kotlin, Swift and React Native
//! binding generators.

bioauth_core::uniffi_reexport_scaffolding!();

pub use bioauth_core::*;
