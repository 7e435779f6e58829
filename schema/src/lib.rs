//! Definition records and the symbol index for proto-mysql.
//!
//! Descriptors coming from `protoc` are converted into plain records
//! ([`FileDef`], [`MessageDef`], [`EnumDef`], [`Field`]) and registered in a
//! [`SchemaIndex`], which answers dotted-path lookups such as
//! `.pkg.Outer.Kind`.
//!
//! ```
//! use proto_mysql_schema::*;
//!
//! let mut index = SchemaIndex::new();
//! index.insert("shop", &[], &[EnumDef::new("Color", &[(0, "RED"), (1, "GREEN")])]);
//!
//! let color = index.resolve_enum(".shop.Color").unwrap();
//! assert_eq!(color.symbols(), vec!["RED", "GREEN"]);
//! ```

pub mod namespace;
pub mod types;

pub use namespace::*;
pub use types::*;
