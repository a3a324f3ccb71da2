//! Remote-set derivation for working copies.
//!
//! The derived set always has an `origin` pointing at the canonical GitHub URL
//! for `(owner, name)`. Every other current remote is carried over under a
//! label chosen by the first matching [`RemoteRule`], unless it is the stale
//! `origin` or already points at one of the owner's GitHub URLs for the pair.
//!
//! Labels inside a bucket are numbered in the natural order of the current
//! remote names (`other`, `other-1`, `other-2`, …), so deriving from an already
//! derived set returns it unchanged.

use std::cmp::Ordering;
use std::collections::HashMap;

use tandem_core::config::OTHER_BUCKET;
use tandem_core::github_url::{self, canonical_url};
use tandem_core::{AliasSet, Owner, RemoteRule, RemoteSet};

pub const ORIGIN: &str = "origin";

/// Derive the remote set a working copy should have.
pub fn derive_remote_set(
    current: &RemoteSet,
    owner: &Owner,
    name: &str,
    exclude: &AliasSet,
    rules: &[RemoteRule],
) -> RemoteSet {
    let mut derived = RemoteSet::new();
    derived.insert(ORIGIN.to_string(), canonical_url(owner, name));

    let mut carried: Vec<(&str, &str)> = current
        .iter()
        .map(|(n, u)| (n.as_str(), u.as_str()))
        .filter(|(remote_name, url)| !is_superseded(remote_name, url, owner, name, exclude))
        .collect();
    carried.sort_by(|a, b| natural_cmp(a.0, b.0));

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (_, url) in carried {
        let bucket = categorize(url, rules);
        let index = seen.entry(bucket).or_insert(0);
        let mut label = bucket_label(bucket, *index);
        while derived.contains_key(&label) {
            *index += 1;
            label = bucket_label(bucket, *index);
        }
        *index += 1;
        derived.insert(label, url.to_string());
    }
    derived
}

/// Bucket name for `url`: first matching rule, else `other`.
pub fn categorize<'a>(url: &str, rules: &'a [RemoteRule]) -> &'a str {
    rules
        .iter()
        .find(|rule| rule.matches(url))
        .map(|rule| rule.name.as_str())
        .unwrap_or(OTHER_BUCKET)
}

fn bucket_label(bucket: &str, index: usize) -> String {
    if index == 0 {
        bucket.to_string()
    } else {
        format!("{bucket}-{index}")
    }
}

fn is_superseded(remote_name: &str, url: &str, owner: &Owner, name: &str, exclude: &AliasSet) -> bool {
    if remote_name == ORIGIN {
        return true;
    }
    match github_url::parse(url) {
        Some(slug) => {
            slug.owner.eq_ignore_ascii_case(&owner.0)
                && (slug.name == name || exclude.contains(&slug.name))
        }
        None => false,
    }
}

/// Compare remote names by base, then numeric `-N` suffix, then full name.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b)).then_with(|| a.cmp(b))
}

fn natural_key(name: &str) -> (&str, Option<u64>) {
    match name.rsplit_once('-') {
        Some((base, suffix)) => match suffix.parse::<u64>() {
            Ok(n) => (base, Some(n)),
            Err(_) => (name, None),
        },
        None => (name, None),
    }
}
