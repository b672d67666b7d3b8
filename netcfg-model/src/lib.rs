//! Vendor-neutral configuration shapes and primitives shared by the lint and
//! render paths.
//!
//! - [`normalized`]: the read-only snapshot of a device's effective config
//! - [`canonical`]: the intent model used as render input
//! - [`path`]: dot/bracket addressing into a serialized config tree
//! - [`mask`]: subnet mask and CIDR prefix conversions
//! - [`load`]: JSON/TOML document loading

pub mod canonical;
pub mod load;
pub mod mask;
pub mod normalized;
pub mod path;
pub mod vendor;

pub use canonical::CanonicalConfig;
pub use load::{load_file, load_str, DocumentFormat, LoadError};
pub use mask::{mask_from_cidr, mask_is_contiguous, mask_to_prefix, wildcard_from_cidr};
pub use normalized::NormalizedConfig;
pub use path::{PathError, PathExpr, Segment};
pub use vendor::{UnknownVendor, Vendor};
