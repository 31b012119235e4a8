#[cfg(test)]
mod integration_tests {
    use crate::backends::local::LocalProcessorFactory;
    use crate::config::{load_and_validate_config, load_config, ProcessorRegistry};
    use crate::errors::{ConfigError, RegistryError};

    fn local_registry() -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new();
        LocalProcessorFactory::register_all(&mut registry).unwrap();
        registry
    }

    /// Test that the shipped YAML configuration loads and validates
    #[test]
    fn test_best_frame_yaml_loading() {
        let config = load_and_validate_config("configs/best-frame.yaml", &local_registry()).unwrap();

        assert_eq!(config.runner.default_concurrency, Some(4));
        assert_eq!(config.stacks.len(), 2);

        let template = config.template("best-frame").unwrap();
        let ids: Vec<&str> = template.processor_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["sample_frames", "score_frames", "select_best_frame"]);
        assert!(template.description.is_some());

        let options = template.steps[0].options.as_ref().unwrap();
        assert_eq!(options.get("frame_count").and_then(|v| v.as_u64()), Some(12));
    }

    /// Unknown processors are all reported, per stack, at load time
    #[test]
    fn test_unknown_processor_yaml_is_rejected() {
        // Parses fine on its own
        assert!(load_config("configs/unknown-processor.yaml").is_ok());

        let err = load_and_validate_config("configs/unknown-processor.yaml", &local_registry())
            .unwrap_err();
        match err {
            ConfigError::Invalid(errors) => {
                assert_eq!(errors.len(), 1);
                match &errors[0] {
                    RegistryError::UnknownProcessors { template_id, missing } => {
                        assert_eq!(template_id, "cutout");
                        let missing: Vec<&str> = missing.iter().map(|id| id.as_str()).collect();
                        assert_eq!(missing, vec!["remove_background", "inpaint"]);
                    }
                    other => panic!("unexpected registry error: {}", other),
                }
            }
            other => panic!("unexpected config error: {}", other),
        }
    }

    /// A registry missing the local processors rejects the shipped config too
    #[test]
    fn test_validation_depends_on_registry_contents() {
        let err = load_and_validate_config("configs/best-frame.yaml", &ProcessorRegistry::new())
            .unwrap_err();
        assert!(err.to_string().contains("Configuration validation failed"));
    }
}
