//! Phone number parsing against per-country numbering plans.
//!
//! The plan table covers lengths and trunk prefixes only; it does not
//! know about area-code allocations beyond the North American NPA/NXX
//! leading-digit rule.

use crate::model::{PhoneFormat, PhoneRules};

/// Numbering plan of one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberingPlan {
    /// ISO 3166 alpha-2 region
    pub region: &'static str,
    /// Country calling code, without `+`
    pub country_code: &'static str,
    /// Shortest national significant number
    pub min_len: usize,
    /// Longest national significant number
    pub max_len: usize,
    /// Prefix dialed before national numbers, stripped when present
    pub trunk_prefix: Option<&'static str>,
}

const fn plan(
    region: &'static str,
    country_code: &'static str,
    min_len: usize,
    max_len: usize,
    trunk_prefix: Option<&'static str>,
) -> NumberingPlan {
    NumberingPlan {
        region,
        country_code,
        min_len,
        max_len,
        trunk_prefix,
    }
}

/// Known numbering plans. The first plan for a shared country code is the
/// one reported for international numbers.
pub const PLANS: &[NumberingPlan] = &[
    plan("US", "1", 10, 10, Some("1")),
    plan("CA", "1", 10, 10, Some("1")),
    plan("GB", "44", 9, 10, Some("0")),
    plan("IE", "353", 7, 9, Some("0")),
    plan("DE", "49", 7, 11, Some("0")),
    plan("FR", "33", 9, 9, Some("0")),
    plan("ES", "34", 9, 9, None),
    plan("PT", "351", 9, 9, None),
    plan("IT", "39", 6, 11, None),
    plan("NL", "31", 9, 9, Some("0")),
    plan("BE", "32", 8, 9, Some("0")),
    plan("CH", "41", 9, 9, Some("0")),
    plan("AT", "43", 7, 13, Some("0")),
    plan("SE", "46", 7, 10, Some("0")),
    plan("NO", "47", 8, 8, None),
    plan("DK", "45", 8, 8, None),
    plan("FI", "358", 6, 10, Some("0")),
    plan("PL", "48", 9, 9, None),
    plan("RU", "7", 10, 10, Some("8")),
    plan("TR", "90", 10, 10, Some("0")),
    plan("IL", "972", 8, 9, Some("0")),
    plan("AE", "971", 8, 9, Some("0")),
    plan("IN", "91", 10, 10, Some("0")),
    plan("CN", "86", 10, 11, Some("0")),
    plan("JP", "81", 9, 10, Some("0")),
    plan("KR", "82", 8, 10, Some("0")),
    plan("HK", "852", 8, 8, None),
    plan("SG", "65", 8, 8, None),
    plan("PH", "63", 10, 10, Some("0")),
    plan("AU", "61", 9, 9, Some("0")),
    plan("NZ", "64", 8, 10, Some("0")),
    plan("BR", "55", 10, 11, Some("0")),
    plan("MX", "52", 10, 10, None),
    plan("AR", "54", 10, 10, Some("0")),
    plan("ZA", "27", 9, 9, Some("0")),
    plan("NG", "234", 8, 10, Some("0")),
];

/// Look up the plan of a region (case-insensitive).
pub fn plan_for_region(region: &str) -> Option<&'static NumberingPlan> {
    PLANS.iter().find(|p| p.region.eq_ignore_ascii_case(region.trim()))
}

/// Look up the plan whose country code prefixes `digits`, longest first.
fn plan_for_international(digits: &str) -> Option<&'static NumberingPlan> {
    (1..=3)
        .rev()
        .filter(|len| digits.len() > *len)
        .find_map(|len| PLANS.iter().find(|p| p.country_code == &digits[..len]))
}

/// A phone number resolved against a numbering plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    /// The plan the number belongs to
    pub plan: &'static NumberingPlan,
    /// National significant number, digits only
    pub national: String,
}

impl PhoneNumber {
    /// Whether the number is in the North American plan.
    pub fn is_nanp(&self) -> bool {
        self.plan.country_code == "1"
    }

    /// National form: `(AAA) BBB-CCCC` for North America, grouped digits
    /// with the trunk prefix elsewhere.
    pub fn national_format(&self) -> String {
        if self.is_nanp() {
            let n = &self.national;
            return format!("({}) {}-{}", &n[..3], &n[3..6], &n[6..]);
        }
        let trunk = self.plan.trunk_prefix.unwrap_or("");
        format!("{}{}", trunk, group_digits(&self.national))
    }

    /// International form: `+1 AAA-BBB-CCCC` or `+CC` followed by groups.
    pub fn international_format(&self) -> String {
        if self.is_nanp() {
            let n = &self.national;
            return format!("+1 {}-{}-{}", &n[..3], &n[3..6], &n[6..]);
        }
        format!("+{} {}", self.plan.country_code, group_digits(&self.national))
    }

    /// E.164 form, e.g. `+442079460958`.
    pub fn e164(&self) -> String {
        format!("+{}{}", self.plan.country_code, self.national)
    }
}

/// Split digits into groups of three, folding a trailing single digit into
/// the last group.
fn group_digits(digits: &str) -> String {
    let mut groups: Vec<String> = digits
        .as_bytes()
        .chunks(3)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect();
    if groups.len() > 1 && groups.last().is_some_and(|g| g.len() == 1) {
        if let Some(last) = groups.pop() {
            if let Some(prev) = groups.last_mut() {
                prev.push_str(&last);
            }
        }
    }
    groups.join(" ")
}

/// Parse a phone number under optional rules.
///
/// Numbers starting with `+` or `00` are international. Others are read
/// in the plan of `rules.country`, or the US plan when no country is set.
/// With `format: US` only North American numbers are accepted.
pub fn parse_phone(raw: &str, rules: Option<&PhoneRules>) -> Option<PhoneNumber> {
    let value = raw.trim();
    if value.is_empty()
        || !value
            .chars()
            .enumerate()
            .all(|(i, c)| c.is_ascii_digit() || " -.()".contains(c) || (c == '+' && i == 0))
    {
        return None;
    }

    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    let international = value.starts_with('+') || digits.starts_with("00");

    let number = if international {
        let digits = if value.starts_with('+') {
            digits.as_str()
        } else {
            &digits[2..]
        };
        let plan = plan_for_international(digits)?;
        let rest = &digits[plan.country_code.len()..];
        resolve(plan, rest)?
    } else {
        let region = rules
            .and_then(|r| r.country.as_deref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("US");
        let plan = plan_for_region(region)?;
        resolve(plan, &digits)?
    };

    let us_only = rules.and_then(|r| r.format) == Some(PhoneFormat::Us);
    if us_only && !number.is_nanp() {
        return None;
    }
    Some(number)
}

fn resolve(plan: &'static NumberingPlan, digits: &str) -> Option<PhoneNumber> {
    let mut national = digits;
    if national.len() > plan.max_len || !in_range(plan, national) {
        if let Some(trunk) = plan.trunk_prefix {
            if let Some(stripped) = national.strip_prefix(trunk) {
                national = stripped;
            }
        }
    }
    if !in_range(plan, national) {
        return None;
    }
    if plan.country_code == "1" {
        // NPA and NXX never start with 0 or 1
        let bytes = national.as_bytes();
        if bytes[0] < b'2' || bytes[3] < b'2' {
            return None;
        }
    }
    Some(PhoneNumber {
        plan,
        national: national.to_string(),
    })
}

fn in_range(plan: &NumberingPlan, national: &str) -> bool {
    (plan.min_len..=plan.max_len).contains(&national.len())
}

/// Canonical display form of a phone number, or `None` if it is invalid.
///
/// International rules, and any number outside North America, use the
/// international form; otherwise the national form.
pub fn format_phone(raw: &str, rules: Option<&PhoneRules>) -> Option<String> {
    let number = parse_phone(raw, rules)?;
    let international = rules.and_then(|r| r.format) == Some(PhoneFormat::International);
    if international || !number.is_nanp() {
        Some(number.international_format())
    } else {
        Some(number.national_format())
    }
}
