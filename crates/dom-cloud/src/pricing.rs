//! Approximate monthly pricing
//!
//! A static table of common droplet sizes plus flat rates for the other
//! resource types. Estimates only; actual billing differs.

use crate::model::{DatabaseCluster, Droplet, Volume};
use std::collections::BTreeMap;

/// Block storage, USD per GB per month
pub const VOLUME_PRICE_PER_GB: f64 = 0.10;

/// Flat placeholder for every database cluster regardless of size
pub const DATABASE_BASE_PRICE: f64 = 15.0;

/// An unassigned reserved IP
pub const RESERVED_IP_PRICE: f64 = 5.0;

/// Smallest load balancer
pub const LOAD_BALANCER_PRICE: f64 = 12.0;

/// Fallback for droplets of unknown size in the per-tag breakdown
pub const UNKNOWN_SIZE_PRICE: f64 = 10.0;

const SIZE_PRICES: &[(&str, f64)] = &[
    ("s-1vcpu-512mb-10gb", 4.0),
    ("s-1vcpu-1gb", 6.0),
    ("s-1vcpu-2gb", 12.0),
    ("s-2vcpu-2gb", 18.0),
    ("s-2vcpu-4gb", 24.0),
    ("s-4vcpu-8gb", 48.0),
    ("s-8vcpu-16gb", 96.0),
];

/// Price of a size slug from the static table
pub fn size_price(slug: &str) -> Option<f64> {
    SIZE_PRICES
        .iter()
        .find(|(s, _)| *s == slug)
        .map(|(_, price)| *price)
}

/// Table price, else the nested `size.price_monthly`, else 0
pub fn droplet_monthly_price(droplet: &Droplet) -> f64 {
    size_price(&droplet.size_slug)
        .or_else(|| droplet.nested_price())
        .unwrap_or(0.0)
}

pub fn volume_monthly_price(volume: &Volume) -> f64 {
    volume.size_gigabytes as f64 * VOLUME_PRICE_PER_GB
}

pub fn database_monthly_price(_cluster: &DatabaseCluster) -> f64 {
    DATABASE_BASE_PRICE
}

/// Sum of every resource's estimated monthly price
pub fn estimate_total(
    droplets: &[Droplet],
    volumes: &[Volume],
    databases: &[DatabaseCluster],
) -> f64 {
    let droplets: f64 = droplets.iter().map(droplet_monthly_price).sum();
    let volumes: f64 = volumes.iter().map(volume_monthly_price).sum();
    let databases: f64 = databases.iter().map(database_monthly_price).sum();
    droplets + volumes + databases
}

/// Per-tag droplet costs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagCosts {
    /// (tag, monthly cost), most expensive first
    pub tags: Vec<(String, f64)>,
    pub untagged: f64,
}

/// Break droplet costs down by tag
///
/// A droplet with several tags counts toward each of them. Droplets whose
/// price cannot be resolved count as `UNKNOWN_SIZE_PRICE`.
pub fn costs_by_tag(droplets: &[Droplet]) -> TagCosts {
    let mut by_tag: BTreeMap<String, f64> = BTreeMap::new();
    let mut untagged = 0.0;

    for droplet in droplets {
        let price = match droplet_monthly_price(droplet) {
            p if p > 0.0 => p,
            _ => UNKNOWN_SIZE_PRICE,
        };

        if droplet.tags.is_empty() {
            untagged += price;
        } else {
            for tag in &droplet.tags {
                *by_tag.entry(tag.clone()).or_insert(0.0) += price;
            }
        }
    }

    let mut tags: Vec<(String, f64)> = by_tag.into_iter().collect();
    tags.sort_by(|a, b| b.1.total_cmp(&a.1));

    TagCosts { tags, untagged }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    fn droplet(name: &str, slug: &str, tags: &[&str]) -> Droplet {
        Droplet {
            name: name.to_string(),
            size_slug: slug.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_table_prices() {
        assert_eq!(size_price("s-1vcpu-1gb"), Some(6.0));
        assert_eq!(size_price("s-8vcpu-16gb"), Some(96.0));
        assert_eq!(size_price("g-2vcpu-8gb"), None);
    }

    #[test]
    fn test_unknown_slug_contributes_zero() {
        assert_eq!(droplet_monthly_price(&droplet("x", "g-2vcpu-8gb", &[])), 0.0);
    }

    #[test]
    fn test_unknown_slug_uses_nested_price() {
        let mut d = droplet("x", "g-2vcpu-8gb", &[]);
        d.size = Some(Size {
            slug: "g-2vcpu-8gb".into(),
            price_monthly: Some(63.0),
        });
        assert_eq!(droplet_monthly_price(&d), 63.0);
    }

    #[test]
    fn test_estimate_total_is_exact_sum() {
        let droplets = vec![
            droplet("a", "s-1vcpu-1gb", &[]),
            droplet("b", "s-2vcpu-4gb", &[]),
            droplet("c", "s-4vcpu-8gb", &[]),
            droplet("d", "unknown-size", &[]),
        ];
        let volumes = vec![Volume {
            size_gigabytes: 100,
            ..Default::default()
        }];
        let databases = vec![DatabaseCluster::default()];

        let total = estimate_total(&droplets, &volumes, &databases);
        assert_eq!(total, 6.0 + 24.0 + 48.0 + 10.0 + 15.0);
        assert_eq!(estimate_total(&droplets, &[], &[]), 78.0);
    }

    #[test]
    fn test_costs_by_tag() {
        let droplets = vec![
            droplet("web-1", "s-1vcpu-1gb", &["web", "prod"]),
            droplet("web-2", "s-2vcpu-4gb", &["web"]),
            droplet("db", "s-4vcpu-8gb", &["prod"]),
            droplet("scratch", "s-1vcpu-2gb", &[]),
            droplet("odd", "custom", &[]),
        ];

        let costs = costs_by_tag(&droplets);
        assert_eq!(
            costs.tags,
            vec![("prod".to_string(), 54.0), ("web".to_string(), 30.0)]
        );
        assert_eq!(costs.untagged, 12.0 + UNKNOWN_SIZE_PRICE);
    }
}
