use super::parse_bool_env;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

/// Limits for the two route groups: lookups/listings and writes/uploads.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub read: RateLimitRule,
    pub write: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            read: RateLimitRule::new(30, 60),
            write: RateLimitRule::new(10, 20),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.enabled = parse_bool_env("RATE_LIMIT_ENABLED", cfg.enabled);

        if let Ok(raw) = env::var("RATE_LIMIT_CONFIG") {
            match parse_rate_limit_config(&raw) {
                Ok(parsed) => cfg = cfg.apply_partial(parsed),
                Err(err) => {
                    tracing::warn!("Invalid RATE_LIMIT_CONFIG '{}': {}", raw, err);
                }
            }
        }

        cfg
    }

    fn apply_partial(mut self, parsed: PartialRateLimitConfig) -> Self {
        if let Some(rule) = parsed.global {
            self.read = rule;
            self.write = rule;
        }
        if let Some(rule) = parsed.read {
            self.read = rule;
        }
        if let Some(rule) = parsed.write {
            self.write = rule;
        }
        self
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct PartialRateLimitConfig {
    global: Option<RateLimitRule>,
    read: Option<RateLimitRule>,
    write: Option<RateLimitRule>,
}

/// Accepts either `per/burst` for every group or `read=per/burst;write=per/burst`.
fn parse_rate_limit_config(raw: &str) -> Result<PartialRateLimitConfig, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    if !trimmed.contains('=') {
        return Ok(PartialRateLimitConfig {
            global: Some(parse_rule(trimmed)?),
            ..Default::default()
        });
    }

    let mut parsed = PartialRateLimitConfig::default();
    for item in trimmed.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, raw_rule) = item
            .split_once('=')
            .ok_or_else(|| format!("invalid item '{}', expected name=per/burst", item))?;
        let rule = parse_rule(raw_rule.trim())?;
        match name.trim().to_ascii_lowercase().as_str() {
            "global" => parsed.global = Some(rule),
            "read" => parsed.read = Some(rule),
            "write" => parsed.write = Some(rule),
            other => {
                return Err(format!("unknown group '{}', expected read/write/global", other));
            }
        }
    }

    Ok(parsed)
}

fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (per_second_raw, burst_raw) = raw
        .split_once('/')
        .ok_or_else(|| format!("invalid rule '{}', expected per/burst", raw))?;

    let per_second: u64 = per_second_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid per_second '{}'", per_second_raw.trim()))?;
    let burst_size: u32 = burst_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid burst_size '{}'", burst_raw.trim()))?;

    if per_second == 0 || burst_size == 0 {
        return Err("per_second and burst_size must be > 0".to_string());
    }

    Ok(RateLimitRule::new(per_second, burst_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_rule_applies_to_both_groups() {
        let parsed = parse_rate_limit_config("12/24").unwrap();
        let cfg = RateLimitConfig::default().apply_partial(parsed);
        assert_eq!(cfg.read, RateLimitRule::new(12, 24));
        assert_eq!(cfg.write, RateLimitRule::new(12, 24));
    }

    #[test]
    fn grouped_rules_override_global() {
        let parsed = parse_rate_limit_config("global=5/5; write=1/2").unwrap();
        let cfg = RateLimitConfig::default().apply_partial(parsed);
        assert_eq!(cfg.read, RateLimitRule::new(5, 5));
        assert_eq!(cfg.write, RateLimitRule::new(1, 2));
    }

    #[test]
    fn unknown_group_is_rejected() {
        let err = parse_rate_limit_config("auth=1/2").unwrap_err();
        assert!(err.contains("unknown group"));
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(parse_rate_limit_config("0/10").is_err());
    }
}
