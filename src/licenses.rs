//! License catalog offered to the license picker
//!
//! Keys are GitHub's license identifiers as accepted by the `license:`
//! search qualifier.

use serde::Serialize;

/// A selectable license
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct License {
    pub key: &'static str,
    pub name: &'static str,
}

const CATALOG: &[License] = &[
    License { key: "agpl-3.0", name: "GNU Affero General Public License v3.0" },
    License { key: "apache-2.0", name: "Apache License 2.0" },
    License { key: "bsd-2-clause", name: "BSD 2-Clause \"Simplified\" License" },
    License { key: "bsd-3-clause", name: "BSD 3-Clause \"New\" or \"Revised\" License" },
    License { key: "bsl-1.0", name: "Boost Software License 1.0" },
    License { key: "cc0-1.0", name: "Creative Commons Zero v1.0 Universal" },
    License { key: "epl-2.0", name: "Eclipse Public License 2.0" },
    License { key: "gpl-2.0", name: "GNU General Public License v2.0" },
    License { key: "gpl-3.0", name: "GNU General Public License v3.0" },
    License { key: "lgpl-2.1", name: "GNU Lesser General Public License v2.1" },
    License { key: "mit", name: "MIT License" },
    License { key: "mpl-2.0", name: "Mozilla Public License 2.0" },
    License { key: "unlicense", name: "The Unlicense" },
];

/// All known licenses, sorted by key
pub fn catalog() -> &'static [License] {
    CATALOG
}

/// Look up a license by key (case-insensitive)
pub fn find(key: &str) -> Option<&'static License> {
    CATALOG.iter().find(|l| l.key.eq_ignore_ascii_case(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sorted_and_unique() {
        let keys: Vec<_> = catalog().iter().map(|l| l.key).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_find() {
        assert_eq!(find("mit").map(|l| l.name), Some("MIT License"));
        assert_eq!(find("Apache-2.0").map(|l| l.key), Some("apache-2.0"));
        assert!(find("wtfpl").is_none());
    }
}
