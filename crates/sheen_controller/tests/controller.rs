use std::sync::Arc;
use std::time::Duration;

use sheen_codec::EffectKind;
use sheen_controller::{
    ApplyOutcome, ControllerConfig, ControllerError, HostError, MemoryHost, NotificationKind,
    StyleController, TargetRulePolicy,
};

const BOX_VALUE: &str = "0px 4px 8px 0px rgba(0, 0, 0, 0.25)";

fn setup(rules: &[&str]) -> (Arc<MemoryHost>, StyleController<MemoryHost>) {
    let host = Arc::new(MemoryHost::new());
    host.add_selected_element(rules);
    let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());
    (host, controller)
}

fn property(host: &MemoryHost, rule: &str, name: &str) -> Option<String> {
    host.properties_of(rule)?.get(name).cloned()
}

#[tokio::test]
async fn single_rule_is_the_target() {
    let (host, controller) = setup(&["base"]);

    let outcome = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();

    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            rule: "base".into(),
            created: false
        }
    );
    assert_eq!(property(&host, "base", "box-shadow").as_deref(), Some(BOX_VALUE));
}

#[tokio::test]
async fn second_rule_is_the_target_for_combo_classes() {
    let (host, controller) = setup(&["base", "variant"]);

    let outcome = controller
        .apply(EffectKind::TextShadow, "0px 2px 4px rgba(0, 0, 0, 0.25)")
        .await
        .unwrap();

    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            rule: "variant".into(),
            created: false
        }
    );
    assert!(property(&host, "base", "text-shadow").is_none());
    assert!(property(&host, "variant", "text-shadow").is_some());
}

#[tokio::test]
async fn element_without_rules_gets_a_new_one() {
    let host = Arc::new(MemoryHost::new());
    let element = host.add_selected_element(&[]);
    let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());

    let outcome = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();

    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            rule: "box-effect-1".into(),
            created: true
        }
    );
    assert_eq!(host.rule_names(element), vec!["box-effect-1"]);
    assert_eq!(property(&host, "box-effect-1", "box-shadow").as_deref(), Some(BOX_VALUE));
}

#[tokio::test]
async fn new_rule_name_skips_existing_rules() {
    let host = Arc::new(MemoryHost::new());
    host.add_style("gradient-effect-1", &[]);
    let element = host.add_selected_element(&[]);
    let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());

    controller
        .apply(EffectKind::Gradient, "linear-gradient(90deg, #000000 0%, #ffffff 100%)")
        .await
        .unwrap();

    assert_eq!(host.rule_names(element), vec!["gradient-effect-2"]);
}

#[tokio::test]
async fn property_is_stripped_from_other_rules() {
    let host = Arc::new(MemoryHost::new());
    let base = host.add_style("base", &[("box-shadow", "1px 1px red"), ("color", "blue")]);
    let variant = host.add_style("variant", &[("margin", "0")]);
    let element = host.add_element(&[base, variant]);
    host.select(Some(element));
    let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());

    controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();

    let base = host.properties_of("base").unwrap();
    assert!(base.get("box-shadow").is_none());
    assert_eq!(base.get("color").map(String::as_str), Some("blue"));

    let variant = host.properties_of("variant").unwrap();
    let keys: Vec<&str> = variant.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["margin", "box-shadow"]);
    assert_eq!(host.property_writes(), 2);
}

#[tokio::test]
async fn same_canonical_value_is_written_once() {
    let (host, controller) = setup(&["base"]);

    let first = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();
    let second = controller
        .apply(EffectKind::BoxShadow, "0 4px  8px rgba(0,0,0,0.25)")
        .await
        .unwrap();

    assert!(matches!(first, ApplyOutcome::Applied { .. }));
    assert_eq!(second, ApplyOutcome::Unchanged);
    assert_eq!(host.property_writes(), 1);
    assert!(!controller.would_change(EffectKind::BoxShadow, BOX_VALUE));

    let notifications = host.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[1].kind, NotificationKind::Info);
    assert_eq!(notifications[1].message, "Box Shadow is already applied");
}

#[tokio::test]
async fn reset_writes_none_and_forgets_the_value() {
    let (host, controller) = setup(&["base", "variant"]);

    controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();
    assert!(controller.last_applied(EffectKind::BoxShadow).is_some());

    controller.reset(EffectKind::BoxShadow).await.unwrap();
    assert_eq!(property(&host, "variant", "box-shadow").as_deref(), Some("none"));
    assert!(controller.last_applied(EffectKind::BoxShadow).is_none());

    // The same value is written again after a reset
    let outcome = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();
    assert!(matches!(outcome, ApplyOutcome::Applied { .. }));
    assert_eq!(property(&host, "variant", "box-shadow").as_deref(), Some(BOX_VALUE));
}

#[tokio::test]
async fn success_is_notified() {
    let (host, controller) = setup(&["base"]);
    controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();

    let notifications = host.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
}

#[tokio::test]
async fn no_selection_is_reported() {
    let host = Arc::new(MemoryHost::new());
    let controller = StyleController::new(Arc::clone(&host), ControllerConfig::default());

    let err = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap_err();

    assert_eq!(err, ControllerError::NoSelection);
    let notifications = host.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert_eq!(notifications[0].message, "Please select an element first");
    assert!(!controller.is_applying());
}

#[tokio::test]
async fn unavailable_host_aborts_the_apply() {
    let (host, controller) = setup(&["base"]);
    host.set_unavailable(true);

    let err = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap_err();

    assert!(matches!(err, ControllerError::HostUnavailable(_)));
    assert!(controller.last_applied(EffectKind::BoxShadow).is_none());
    assert!(!controller.is_applying());
}

#[tokio::test]
async fn not_found_errors_are_not_toasted() {
    let (host, controller) = setup(&["base"]);
    host.fail_next(HostError::with_code(404, "element went away"));

    let err = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap_err();

    assert!(matches!(err, ControllerError::Host(ref e) if e.is_not_found()));
    assert!(host.notifications().is_empty());
    assert!(!controller.is_applying());

    // The user retries by applying again
    controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();
    assert_eq!(host.property_writes(), 1);
}

#[tokio::test]
async fn other_host_errors_are_toasted() {
    let (host, controller) = setup(&["base"]);
    host.fail_next(HostError::with_code(500, "server exploded"));

    let err = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap_err();

    assert!(matches!(err, ControllerError::Host(_)));
    let notifications = host.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert!(notifications[0].message.contains("server exploded"));
}

#[tokio::test(start_paused = true)]
async fn concurrent_apply_is_rejected() {
    let host = Arc::new(MemoryHost::new());
    host.add_selected_element(&["base"]);
    host.set_latency(Duration::from_millis(50));
    let controller = Arc::new(StyleController::new(
        Arc::clone(&host),
        ControllerConfig::default(),
    ));

    let first = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.apply(EffectKind::BoxShadow, BOX_VALUE).await })
    };
    tokio::task::yield_now().await;
    assert!(controller.is_applying());

    let second = controller
        .apply(EffectKind::TextShadow, "0px 2px 4px rgba(0, 0, 0, 0.25)")
        .await;
    assert_eq!(second, Err(ControllerError::Busy));

    assert!(matches!(first.await.unwrap(), Ok(ApplyOutcome::Applied { .. })));
    assert!(!controller.is_applying());
}

#[tokio::test]
async fn target_policy_is_configurable() {
    let host = Arc::new(MemoryHost::new());
    host.add_selected_element(&["base", "variant", "state"]);

    for (policy, expected) in [
        (TargetRulePolicy::First, "base"),
        (TargetRulePolicy::Last, "state"),
        (TargetRulePolicy::PreferSecond, "variant"),
    ] {
        let controller = StyleController::new(
            Arc::clone(&host),
            ControllerConfig {
                target_policy: policy,
                ..ControllerConfig::default()
            },
        );
        let outcome = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();
        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                rule: expected.into(),
                created: false
            }
        );
        assert_eq!(property(&host, expected, "box-shadow").as_deref(), Some(BOX_VALUE));
    }
}

#[tokio::test]
async fn iterator_style_lists_are_normalized() {
    let (host, controller) = setup(&["base", "variant"]);
    host.set_styles_as_iter(true);

    let outcome = controller.apply(EffectKind::BoxShadow, BOX_VALUE).await.unwrap();

    assert_eq!(
        outcome,
        ApplyOutcome::Applied {
            rule: "variant".into(),
            created: false
        }
    );
}
