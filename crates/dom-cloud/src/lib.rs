//! DigitalOcean API access for dom
//!
//! This crate provides typed access to the DigitalOcean REST API together
//! with the static rules the CLI applies to the fetched resources.
//!
//! # Modules
//!
//! - [`api`]: the `DoApi` trait every command is written against
//! - [`client`]: `DoClient`, the reqwest implementation (Bearer token, pagination)
//! - [`model`]: read-only resource projections (droplets, volumes, domains, ...)
//! - [`pricing`]: approximate monthly price table and cost roll-ups
//! - [`cleanup`]: orphan predicates (unattached volumes, old snapshots, ...)
//!
//! # Example
//!
//! ```ignore
//! use dom_cloud::{DoApi, DoClient};
//!
//! let client = DoClient::new(token);
//! let droplets = client.list_droplets(Some("web")).await?;
//! ```

pub mod api;
pub mod cleanup;
pub mod client;
pub mod error;
pub mod model;
pub mod pricing;

pub use api::{DoApi, DropletAction};
pub use client::{DIGITALOCEAN_API_BASE, DoClient};
pub use error::{DoError, Result};
pub use model::*;
