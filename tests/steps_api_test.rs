//! Integration tests for the steps public API.

use std::fs;
use tempfile::TempDir;
use workstrap::config::{CompletedCheck, InterpolationContext, RunConfiguration, StepConfig};
use workstrap::steps::{run_check, CheckResult, FnStep, ShellStep, Step, StepContext, StepRegistry};
use workstrap::WorkstrapError;

#[test]
fn public_api_accessible() {
    let _check_result = CheckResult::complete("test");
    let _registry = StepRegistry::new();
    let _config = RunConfiguration::default();
}

#[test]
fn shell_step_converges() {
    let temp = TempDir::new().unwrap();
    let step = ShellStep::from_config(&StepConfig {
        name: "marker".to_string(),
        check: Some(CompletedCheck::FileExists {
            path: "marker".to_string(),
        }),
        command: "touch marker".to_string(),
        ..Default::default()
    });
    let config = RunConfiguration::default();
    let ctx = StepContext::new(&config, temp.path());

    assert!(!step.check(&ctx).unwrap().complete);
    step.apply(&ctx).unwrap();
    assert!(step.check(&ctx).unwrap().complete);

    // Re-applying is harmless.
    step.apply(&ctx).unwrap();
    assert!(step.check(&ctx).unwrap().complete);
}

#[test]
fn nested_checks() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("Brewfile"), "brew \"git\"").unwrap();
    let ctx = InterpolationContext::new();

    let all = CompletedCheck::All {
        checks: vec![
            CompletedCheck::FileExists {
                path: "Brewfile".to_string(),
            },
            CompletedCheck::CommandSucceeds {
                command: "true".to_string(),
            },
        ],
    };
    assert!(run_check(&all, &ctx, temp.path()).unwrap().complete);

    let any = CompletedCheck::Any {
        checks: vec![
            CompletedCheck::FileExists {
                path: "missing".to_string(),
            },
            CompletedCheck::CommandOutput {
                command: "echo ready".to_string(),
                equals: "ready".to_string(),
            },
        ],
    };
    assert!(run_check(&any, &ctx, temp.path()).unwrap().complete);
}

#[test]
fn check_reads_configuration() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("studio.conf"), "").unwrap();
    let config = RunConfiguration::new(Some("studio".to_string()), None, None);
    let ctx = InterpolationContext::from_config(&config);

    let check = CompletedCheck::FileExists {
        path: "${hostname}.conf".to_string(),
    };
    assert!(run_check(&check, &ctx, temp.path()).unwrap().complete);
}

#[test]
fn registry_keeps_order_and_rejects_duplicates() {
    let mut registry = StepRegistry::new();
    for name in ["xcode", "homebrew", "fonts"] {
        registry
            .register(Box::new(FnStep::new(name, |_| Ok(true), |_| Ok(()))))
            .unwrap();
    }

    let err = registry
        .register(Box::new(FnStep::new("homebrew", |_| Ok(true), |_| Ok(()))))
        .unwrap_err();
    assert!(matches!(err, WorkstrapError::DuplicateName { .. }));

    let names: Vec<&str> = registry.all().map(|step| step.name()).collect();
    assert_eq!(names, vec!["xcode", "homebrew", "fonts"]);
    // Iterating again yields the same sequence.
    assert_eq!(registry.all().count(), 3);
}
