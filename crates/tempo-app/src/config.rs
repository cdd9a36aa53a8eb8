//! Environment-driven app settings.
//!
//! | variable                   | default        |
//! |----------------------------|----------------|
//! | `TEMPO_TITLE`              | `tempo`        |
//! | `TEMPO_WIDTH`              | `640`          |
//! | `TEMPO_HEIGHT`             | `360`          |
//! | `TEMPO_EXIT_WHEN_MEASURED` | off            |
//!
//! Logging is configured separately (`TEMPO_LOG` / `RUST_LOG`).

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
    /// Quit as soon as TTI is reported, for scripted repeated launches.
    pub exit_when_measured: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "tempo".to_string(),
            width: 640.0,
            height: 360.0,
            exit_when_measured: false,
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// Returns the config plus warnings for values that were ignored; they
    /// are logged by the caller once the logger is up.
    pub fn from_env() -> (Self, Vec<String>) {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> (Self, Vec<String>) {
        let mut cfg = Self::default();
        let mut warnings = Vec::new();

        if let Some(title) = lookup("TEMPO_TITLE").filter(|t| !t.trim().is_empty()) {
            cfg.title = title;
        }

        for (key, slot) in [("TEMPO_WIDTH", &mut cfg.width), ("TEMPO_HEIGHT", &mut cfg.height)] {
            let Some(raw) = lookup(key) else { continue };
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v >= 1.0 => *slot = v,
                _ => warnings.push(format!("ignoring {key}={raw:?}: expected a size >= 1")),
            }
        }

        if let Some(raw) = lookup("TEMPO_EXIT_WHEN_MEASURED") {
            match parse_flag(&raw) {
                Some(v) => cfg.exit_when_measured = v,
                None => warnings.push(format!(
                    "ignoring TEMPO_EXIT_WHEN_MEASURED={raw:?}: expected 1/0, true/false, yes/no"
                )),
            }
        }

        (cfg, warnings)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(pairs: &[(&str, &str)]) -> (AppConfig, Vec<String>) {
        AppConfig::from_lookup(|k| {
            pairs.iter().find(|(n, _)| *n == k).map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn defaults_without_env() {
        let (cfg, warnings) = load(&[]);
        assert_eq!(cfg, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let (cfg, warnings) = load(&[
            ("TEMPO_TITLE", "bench"),
            ("TEMPO_WIDTH", "800"),
            ("TEMPO_HEIGHT", " 600.5 "),
            ("TEMPO_EXIT_WHEN_MEASURED", "Yes"),
        ]);
        assert!(warnings.is_empty());
        assert_eq!(cfg.title, "bench");
        assert_eq!(cfg.width, 800.0);
        assert_eq!(cfg.height, 600.5);
        assert!(cfg.exit_when_measured);
    }

    #[test]
    fn bad_sizes_fall_back_with_warning() {
        let (cfg, warnings) = load(&[("TEMPO_WIDTH", "wide"), ("TEMPO_HEIGHT", "0")]);
        assert_eq!(cfg.width, 640.0);
        assert_eq!(cfg.height, 360.0);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("TEMPO_WIDTH"));
    }

    #[test]
    fn blank_title_keeps_default() {
        let (cfg, _) = load(&[("TEMPO_TITLE", "   ")]);
        assert_eq!(cfg.title, "tempo");
    }

    #[test]
    fn flag_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn unknown_flag_warns_and_stays_off() {
        let (cfg, warnings) = load(&[("TEMPO_EXIT_WHEN_MEASURED", "sometimes")]);
        assert!(!cfg.exit_when_measured);
        assert_eq!(warnings.len(), 1);
    }
}
