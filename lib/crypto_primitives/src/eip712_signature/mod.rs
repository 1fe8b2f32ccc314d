//! Implementation of the typed structured data hashing and signing defined by EIP-712.

pub mod member_types;
pub mod struct_builder;
pub mod typed_structure;
