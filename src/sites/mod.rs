//! Site catalog services
//!
//! One submodule per supported site. Each owns its URL builders, selector
//! schemas, and payload shapes, and drives the shared fetch pipeline. The
//! rest of the crate knows nothing about any particular site's markup.

pub mod otakudesu;

pub use otakudesu::{Lookup, Otakudesu};
