mod common;

use confcheck::audit::{run_all_checks, Rule, SERVICE_SCHEMA};

use common::{first_violation, init_tracing, valid};

#[test]
fn baseline_fixture_passes() {
    init_tracing();
    assert_eq!(run_all_checks(&valid().build()), Ok(()));
}

#[test]
fn every_required_option_is_enforced_by_name() {
    init_tracing();

    let required: Vec<(&str, &str)> = SERVICE_SCHEMA
        .rules()
        .filter_map(|rule| match rule {
            Rule::Required { section, option } => Some((*section, *option)),
            _ => None,
        })
        .collect();
    assert_eq!(required.len(), 27);

    for (section, option) in required {
        let src = valid().unset(section, option).build();
        let err = first_violation(&src);

        assert_eq!(err.section, section, "removing {section}:{option}");
        assert_eq!(err.option.as_deref(), Some(option), "removing {section}:{option}");
        assert_eq!(err.message, format!("{section}:{option} should be set."));
    }
}

#[test]
fn missing_section_reads_as_missing_options() {
    let src = valid().without_section("rabbit").build();
    let err = first_violation(&src);
    assert_eq!(err.message, "rabbit:uri should be set.");
}

#[test]
fn empty_source_fails_on_the_first_section() {
    let src = common::ServiceConfigBuilder::empty().build();
    let err = first_violation(&src);
    assert_eq!(err.message, "general:TAG should be set.");
}

#[test]
fn empty_value_counts_as_set() {
    let src = valid().set("web", "log_ex", "").build();
    assert!(run_all_checks(&src).is_ok());
}

#[test]
fn optional_options_may_be_absent() {
    let src = valid()
        .unset("web", "accept_nonce")
        .unset("web", "tenant_name")
        .set("web", "access_control", "jwt")
        .set("web", "apim_public_key", "key")
        .build();
    assert!(run_all_checks(&src).is_ok());
}
