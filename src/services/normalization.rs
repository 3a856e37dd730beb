//! Canonicalisation of raw filter input: location aliases, comma separated
//! multi-selects, salary band labels and company size labels.
//!
//! The city and size tables live in [`Classification`] so they can be loaded
//! from JSON and tested apart from the predicate logic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

const RANGE_SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationAlias {
    pub label: String,
    pub slug: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl LocationAlias {
    fn new(label: &str, slug: &str, aliases: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            slug: slug.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn folded_terms(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.label.as_str())
            .chain(std::iter::once(self.slug.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
            .map(fold)
            .filter(|term| !term.is_empty())
    }
}

/// Upper bound is inclusive; `None` closes the table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeBucketRule {
    pub key: String,
    pub label: String,
    pub max: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub cities: Vec<LocationAlias>,
    pub remote: LocationAlias,
    pub size_buckets: Vec<SizeBucketRule>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            cities: vec![
                LocationAlias::new("Sofia", "sofia", &["София", "Sofiya"]),
                LocationAlias::new("Plovdiv", "plovdiv", &["Пловдив"]),
                LocationAlias::new("Varna", "varna", &["Варна"]),
                LocationAlias::new("Burgas", "burgas", &["Бургас", "Bourgas"]),
                LocationAlias::new("Ruse", "ruse", &["Русе", "Rousse"]),
                LocationAlias::new("Stara Zagora", "stara-zagora", &["Стара Загора"]),
            ],
            remote: LocationAlias::new("Remote", "remote", &["Дистанционно", "Work from home"]),
            size_buckets: vec![
                SizeBucketRule {
                    key: "micro".to_string(),
                    label: "1-9".to_string(),
                    max: Some(9),
                },
                SizeBucketRule {
                    key: "small".to_string(),
                    label: "10-30".to_string(),
                    max: Some(30),
                },
                SizeBucketRule {
                    key: "medium".to_string(),
                    label: "31-70".to_string(),
                    max: Some(70),
                },
                SizeBucketRule {
                    key: "large".to_string(),
                    label: "70+".to_string(),
                    max: None,
                },
            ],
        }
    }
}

impl Classification {
    fn entries(&self) -> impl Iterator<Item = &LocationAlias> {
        self.cities.iter().chain(std::iter::once(&self.remote))
    }

    pub fn remote_label(&self) -> &str {
        &self.remote.label
    }

    /// Canonical label for user supplied filter input. Exact alias matches win,
    /// then free text such as "Sofia, Bulgaria" is classified.
    pub fn canonical_location(&self, input: &str) -> Option<&str> {
        let folded = fold(input);
        if folded.is_empty() {
            return None;
        }

        self.entries()
            .find(|entry| entry.folded_terms().any(|term| term == folded))
            .map(|entry| entry.label.as_str())
            .or_else(|| self.classify_location(input))
    }

    /// Case-insensitive substring classification of a stored location into a
    /// known label. Punctuation is ignored, so "Sofia." and "Varna; BG" classify.
    pub fn classify_location(&self, text: &str) -> Option<&str> {
        let folded = fold(text);
        if folded.is_empty() {
            return None;
        }

        self.entries()
            .find(|entry| entry.folded_terms().any(|term| folded.contains(term.as_str())))
            .map(|entry| entry.label.as_str())
    }

    pub fn size_bucket(&self, employees: u32) -> Option<&SizeBucketRule> {
        self.size_buckets
            .iter()
            .find(|rule| rule.max.map_or(true, |max| employees <= max))
    }
}

/// Lowercases and turns every run of non-alphanumeric characters into a
/// single space.
fn fold(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits `"a, b,,a"` into the set `{a, b}`.
pub fn parse_multi_select(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBand {
    pub min: u32,
    /// `None` means "and above".
    pub max: Option<u32>,
}

/// Parses band labels like "3000-5000", "5000+" or "3000". A bare number is an
/// exact band.
pub fn parse_salary_band(label: &str) -> Option<SalaryBand> {
    let label = label.trim();
    if let Some((left, right)) = label.split_once(&RANGE_SEPARATORS[..]) {
        let lower = first_number(left)?;
        return Some(match first_number(right) {
            Some(upper) if upper < lower => SalaryBand {
                min: upper,
                max: Some(lower),
            },
            Some(upper) => SalaryBand {
                min: lower,
                max: Some(upper),
            },
            None => SalaryBand {
                min: lower,
                max: None,
            },
        });
    }

    let min = first_number(label)?;
    let max = if label.contains('+') { None } else { Some(min) };
    Some(SalaryBand { min, max })
}

/// Employee count from a size label. For ranges the right-hand side wins.
pub fn parse_company_size(label: &str) -> Option<u32> {
    if let Some((left, right)) = label.split_once(&RANGE_SEPARATORS[..]) {
        if let Some(upper) = first_number(right) {
            return Some(upper);
        }
        return first_number(left);
    }
    first_number(label)
}

fn first_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}
