use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

#[allow(dead_code)]
mod sanity_check_bin {
    include!("../sanity_check.rs");

    #[cfg(test)]
    mod coverage_tests {
        use super::*;
        use rust_neural_gradcheck::gradcheck::GradientMismatch;

        #[test]
        fn test_config_from_args_with_path() {
            let config_json = r#"{
  "input_size": 3,
  "hidden_size": 2,
  "output_size": 4,
  "batch_size": 5,
  "seed": 17,
  "stop_at_first_mismatch": true
}"#;
            let temp = crate::write_temp_config(config_json);
            let args = vec![
                "sanity_check".to_string(),
                temp.path().to_str().unwrap().to_string(),
            ];
            let config = config_from_args(&args).unwrap();
            assert_eq!(config.input_size, 3);
            assert_eq!(config.output_size, 4);
            assert!(config.stop_at_first_mismatch);
        }

        #[test]
        fn test_config_from_args_bad_path() {
            let args = vec![
                "sanity_check".to_string(),
                "missing/config.json".to_string(),
            ];
            assert!(config_from_args(&args).is_err());
        }

        #[test]
        fn test_default_run_passes_and_prints() {
            let args = vec!["sanity_check".to_string()];
            let config = config_from_args(&args).unwrap();
            let report = run_sanity_check(&config).unwrap();
            assert!(report.passed());
            print_report(&report);
        }

        #[test]
        fn test_print_failed_report() {
            let report = GradCheckReport {
                baseline_cost: 2.3,
                checked: 12,
                max_relative_error: 0.5,
                mismatches: (0..12)
                    .map(|index| GradientMismatch {
                        index,
                        numerical: 1.0,
                        analytical: 0.5,
                        relative_error: 0.5,
                    })
                    .collect(),
            };
            assert!(!report.passed());
            print_report(&report);
        }
    }
}
