mod common;

use confcheck::audit::{run_all_checks, Rule, SERVICE_SCHEMA};

use common::{first_violation, valid};

fn flip_case(value: &str) -> String {
    if value == value.to_lowercase() {
        value.to_uppercase()
    } else {
        value.to_lowercase()
    }
}

#[test]
fn enum_rules_accept_exactly_their_literals() {
    let enums: Vec<_> = SERVICE_SCHEMA
        .rules()
        .filter(|rule| matches!(rule, Rule::Enum { .. }))
        .collect();
    assert_eq!(enums.len(), 13);

    for rule in enums {
        let Rule::Enum {
            section,
            option,
            allowed,
        } = *rule
        else {
            unreachable!()
        };

        for value in allowed {
            let src = valid().set(section, option, value).build();
            assert!(rule.evaluate(&src).is_ok(), "{section}:{option} = {value}");

            let flipped = flip_case(value);
            assert!(!allowed.iter().any(|a| *a == flipped));
            let src = valid().set(section, option, &flipped).build();
            let err = rule.evaluate(&src).unwrap_err();
            assert_eq!(err.option.as_deref(), Some(option));
        }

        for bogus in ["", "maybe", "1"] {
            let src = valid().set(section, option, bogus).build();
            assert!(rule.evaluate(&src).is_err(), "{section}:{option} = {bogus:?}");
        }
    }
}

#[test]
fn boolean_literal_case_differs_per_option() {
    let err = first_violation(&valid().set("workers", "auto_remove", "True").build());
    assert_eq!(err.message, "workers:auto_remove should be set to true or false.");

    let err = first_violation(&valid().set("workers", "use_tas_uid", "true").build());
    assert_eq!(err.message, "workers:use_tas_uid should be set to True or False.");

    let err = first_violation(&valid().set("web", "show_traceback", "False").build());
    assert_eq!(err.message, "web:show_traceback should be set to true or false.");

    let err = first_violation(&valid().set("web", "accept_nonce", "false").build());
    assert_eq!(err.message, "web:accept_nonce should be set to True or False.");
}

#[test]
fn optional_log_levels_are_checked_only_when_present() {
    assert!(run_all_checks(&valid().set("logs", "level.controllers", "ERROR").build()).is_ok());

    let err = first_violation(&valid().set("logs", "level.docker_util", "INFO").build());
    assert_eq!(err.message, "logs:level.docker_util should be set to ERROR or DEBUG.");
}

#[test]
fn mongo_credentials_come_in_pairs() {
    let err = first_violation(&valid().set("store", "mongo_user", "admin").build());
    assert_eq!(err.section, "store");
    assert_eq!(
        err.message,
        "store:mongo_user and store:mongo_password must be set concurrently."
    );

    let err = first_violation(&valid().set("store", "mongo_password", "pw").build());
    assert_eq!(err.option.as_deref(), Some("mongo_user"));

    let both = valid()
        .set("store", "mongo_user", "admin")
        .set("store", "mongo_password", "pw")
        .build();
    assert!(run_all_checks(&both).is_ok());
    assert!(run_all_checks(&valid().build()).is_ok());
}

fn jwt() -> common::ServiceConfigBuilder {
    valid()
        .set("web", "access_control", "jwt")
        .unset("web", "accept_nonce")
        .unset("web", "tenant_name")
}

#[test]
fn jwt_requires_public_key() {
    let err = first_violation(&jwt().build());
    assert_eq!(err.option.as_deref(), Some("apim_public_key"));
    assert_eq!(
        err.message,
        "web:apim_public_key must be set if 'access_control' is set to 'jwt'."
    );

    let src = jwt().set("web", "apim_public_key", "MIGfMA0GCSqGSIb3DQEB").build();
    assert!(run_all_checks(&src).is_ok());
}

#[test]
fn no_access_control_requires_nonce_and_tenant_independently() {
    let err = first_violation(&valid().unset("web", "accept_nonce").build());
    assert_eq!(
        err.message,
        "web:accept_nonce must be set if 'access_control' is set to 'none'."
    );

    let err = first_violation(&valid().unset("web", "tenant_name").build());
    assert_eq!(
        err.message,
        "web:tenant_name must be set if 'access_control' is set to 'none'."
    );

    assert!(run_all_checks(&valid().build()).is_ok());
}

#[test]
fn unknown_access_control_is_rejected_before_conditionals() {
    let err = first_violation(&valid().set("web", "access_control", "oauth").build());
    assert_eq!(err.message, "web:access_control should be set to jwt or none.");
}

#[test]
fn host_queues_must_be_known_to_web() {
    let ok = valid()
        .set("spawner", "host_queues", "q1,q2")
        .set("web", "all_queues", "q1,q2,q3")
        .build();
    assert!(run_all_checks(&ok).is_ok());

    let bad = valid()
        .set("spawner", "host_queues", "q1,q4")
        .set("web", "all_queues", "q1,q2,q3")
        .build();
    let err = first_violation(&bad);
    assert_eq!(err.section, "web");
    assert_eq!(err.option, None);
    assert!(err.message.contains("spawner:host_queues"));
    assert!(err.message.contains("web:all_queues"));
    assert!(err.message.contains("q4"));
}

#[test]
fn queue_lists_tolerate_spacing_and_order() {
    let src = valid()
        .set("spawner", "host_queues", "  priority ,default")
        .set("web", "all_queues", "default, special,priority")
        .build();
    assert!(run_all_checks(&src).is_ok());
}

#[test]
fn empty_host_queues_is_a_subset_of_anything() {
    let src = valid().set("spawner", "host_queues", "").build();
    assert!(run_all_checks(&src).is_ok());
}
