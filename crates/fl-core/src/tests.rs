//! Unit tests for fl-core primitives.

#[cfg(test)]
mod ids {
    use crate::AgentIndex;

    #[test]
    fn ordering() {
        assert!(AgentIndex(0) < AgentIndex(1));
        assert!(AgentIndex(9) > AgentIndex(3));
    }

    #[test]
    fn display() {
        assert_eq!(AgentIndex(7).to_string(), "idx=7");
    }
}

#[cfg(test)]
mod time {
    use crate::{Step, StepClock};

    #[test]
    fn step_arithmetic() {
        let s = Step(10);
        assert_eq!(s + 5, Step(15));
        assert_eq!(s.offset(3), Step(13));
        assert_eq!(Step(15) - Step(10), 5u64);
        assert_eq!(Step(4).signed_since(Step(10)), -6);
    }

    #[test]
    fn back_clamps_at_zero() {
        assert_eq!(Step(100).back(25), Step(75));
        assert_eq!(Step(10).back(25), Step::ZERO);
    }

    #[test]
    fn offset_saturates() {
        assert_eq!(Step(u64::MAX).offset(1), Step(u64::MAX));
    }

    #[test]
    fn clock_conversion() {
        let clock = StepClock::new(0.1);
        assert!((clock.secs_at(Step(250)) - 25.0).abs() < 1e-9);
        assert!((clock.span_secs(-40) + 4.0).abs() < 1e-9);
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{AnalysisConfig, ConfigError, ImpactParams, Nominal};

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AnalysisConfig::default();
        assert_eq!(cfg.pre, 25);
        assert_eq!(cfg.post, 150);
        assert_eq!(cfg.slope_window, 25);
        assert_eq!(cfg.speed_tol, 0.05);
        assert_eq!(cfg.gap_tol_frac, 0.05);
        assert_eq!(cfg.min_consecutive, 10);
        assert_eq!(cfg.end_fraction, 0.8);
        assert!(cfg.nominal_speed.is_none());
        assert!(cfg.clock().is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn toml_overrides_only_given_keys() {
        let cfg = AnalysisConfig::from_toml_str("pre = 10\nnominal_speed = 2.0\n").unwrap();
        assert_eq!(cfg.pre, 10);
        assert_eq!(cfg.nominal_speed, Some(2.0));
        assert_eq!(cfg.post, 150);
    }

    #[test]
    fn toml_rejects_unknown_keys() {
        let err = AnalysisConfig::from_toml_str("prre = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_consecutive = 3\nstep_secs = 0.5").unwrap();
        let cfg = AnalysisConfig::load(file.path()).unwrap();
        assert_eq!(cfg.min_consecutive, 3);
        assert_eq!(cfg.clock().unwrap().step_secs, 0.5);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = AnalysisConfig::load(std::path::Path::new("/nonexistent/fl.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn validation_rejects_degenerate_values() {
        let bad = [
            AnalysisConfig { min_consecutive: 0, ..Default::default() },
            AnalysisConfig { slope_window: 0, ..Default::default() },
            AnalysisConfig { speed_tol: -0.1, ..Default::default() },
            AnalysisConfig { gap_tol_frac: f64::NAN, ..Default::default() },
            AnalysisConfig { end_fraction: 1.5, ..Default::default() },
            AnalysisConfig { nominal_spacing: Some(0.0), ..Default::default() },
            AnalysisConfig { step_secs: Some(-1.0), ..Default::default() },
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(ConfigError::Invalid(_))),
                "accepted {cfg:?}"
            );
        }
    }

    #[test]
    fn nominal_inferred_only_when_missing() {
        let cfg = AnalysisConfig { nominal_speed: Some(1.2), ..Default::default() };
        assert_eq!(
            cfg.resolve_nominal(0.9, 4.0),
            Nominal { speed: 1.2, spacing: 4.0 }
        );
    }

    #[test]
    fn impact_params_mirror_config() {
        let cfg = AnalysisConfig { post: 60, ..Default::default() };
        let p = cfg.impact_params();
        assert_eq!(p.post, 60);
        assert_eq!(ImpactParams::default().post, 150);
    }
}

#[cfg(test)]
mod paths {
    use std::path::Path;

    use crate::{ConfigError, InputPaths};

    #[test]
    fn required_files_reported() {
        let paths = InputPaths::new("losses.csv");
        assert!(matches!(paths.require_summary(), Err(ConfigError::Invalid(_))));
        assert!(matches!(paths.require_trace(), Err(ConfigError::Invalid(_))));

        let paths = paths.with_summary("summary.csv").with_trace("trace.csv");
        assert_eq!(paths.require_summary().unwrap(), Path::new("summary.csv"));
        assert_eq!(paths.require_trace().unwrap(), Path::new("trace.csv"));
        assert_eq!(paths.losses, Path::new("losses.csv"));
    }
}
