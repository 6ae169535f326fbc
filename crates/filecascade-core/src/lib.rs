//! FileCascade Core Types and Definitions
//!
//! This crate provides the foundational types shared by the FileCascade
//! parsing engine and its front-ends. It includes:
//!
//! - **Type tags**: Runtime type identities used as "desired types" ([`type_tag::TypeTag`])
//! - **Values**: Type-erased parsed objects ([`value::Value`])
//! - **Capabilities**: What a parser or converter can produce ([`capabilities`] module)
//! - **Filesystem objects**: Single-file and multi-file items on disk ([`fs`] module)

pub mod capabilities;
pub mod fs;
pub mod type_tag;
pub mod value;
