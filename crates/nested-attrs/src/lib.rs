//! Nested attribute values and the dotted-path codec.
//!
//! An attribute tree is a [`Record`] whose values may be records again,
//! arrays, scalars or opaque [`EntityRef`] handles. This crate converts
//! between the nested view and the flat `path -> value` view used for change
//! detection, and turns partial updates into explicit [`Update`] steps.
//!
//! # Example
//!
//! ```
//! use nested_attrs::{flatten, get, AttrValue, Record};
//! use serde_json::json;
//!
//! let tree: Record = AttrValue::from(json!({"net": {"vlan": 10, "tag": "x"}}))
//!     .into_record()
//!     .unwrap();
//!
//! let flat = flatten(&tree);
//! assert_eq!(flat.get("net.vlan"), Some(&AttrValue::from(10)));
//! assert_eq!(get(&tree, "net.tag"), Some(&AttrValue::from("x")));
//! assert_eq!(get(&tree, "net.vlan.deeper"), None);
//! ```

pub mod clone;
pub mod error;
pub mod flatten;
pub mod path;
pub mod update;
pub mod value;

pub use clone::{deep_clone, deep_clone_record};
pub use error::PathError;
pub use flatten::{flatten, flatten_into, unflatten, PathMap};
pub use path::{ancestors, get, join, set_at_path, unset_at_path, SEPARATOR};
pub use update::{merge, overlay, Attrs, Update};
pub use value::{record, AttrValue, EntityRef, Record};
