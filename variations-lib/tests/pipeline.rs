//! End-to-end tests from raw command line to trials.

use serde_json::json;
use variations_lib::{
  FeatureState,
  Trial,
  trials_from_command_line,
};

#[test]
fn single_active_trial_with_feature() {
  let trials = trials_from_command_line(
    "--force-fieldtrials=*StudyA/GroupX/ --enable-features=FeatureFoo<StudyA",
  );

  let mut expected = Trial::new("GroupX", true);
  expected
    .features
    .insert("FeatureFoo".to_string(), FeatureState::Enabled);

  assert_eq!(trials.len(), 1);
  assert_eq!(trials.get("StudyA"), Some(&expected));
}

#[test]
fn serializes_as_nested_maps() {
  let trials = trials_from_command_line(concat!(
    "/opt/chrome/chrome --flag-switches-begin ",
    "--force-fieldtrials=*StudyA/GroupX/StudyB/GroupY ",
    "--force-fieldtrial-params=StudyA.GroupX:max/10/mode/fast ",
    "--enable-features=Foo<StudyA,*Bar<StudyB ",
    "--disable-features=Baz<StudyB ",
    "--flag-switches-end about:blank",
  ));

  let value = serde_json::to_value(&trials).unwrap();
  assert_eq!(
    value,
    json!({
      "StudyA": {
        "group": "GroupX",
        "active": true,
        "features": { "Foo": "enabled" },
        "params": { "max": "10", "mode": "fast" },
      },
      "StudyB": {
        "group": "GroupY",
        "active": false,
        "features": { "Bar": "default", "Baz": "disabled" },
        "params": {},
      },
    })
  );
}

#[test]
fn quoted_switch_values() {
  let trials = trials_from_command_line(concat!(
    r#"--force-fieldtrials="My Study/Group 1/" "#,
    r#"'--force-fieldtrial-params=My%20Study.Group%201:label/hello%20world' "#,
    r#"--enable-features=Feature\ One\<My\ Study"#,
  ));

  let trial = trials.get("My Study").unwrap();
  assert_eq!(trial.group, "Group 1");
  assert_eq!(trial.param("label"), Some("hello world"));
  assert_eq!(trial.feature("Feature One"), Some(FeatureState::Enabled));
}

#[test]
fn multiline_command_line() {
  let trials = trials_from_command_line(
    "chrome \\\r\n  --force-fieldtrials=A/G/ \\\r\n  --enable-features=F<A\r\n",
  );
  assert_eq!(trials.get("A").unwrap().feature("F"), Some(FeatureState::Enabled));
}

#[test]
fn params_for_unknown_trials_leave_others_alone() {
  let trials = trials_from_command_line(concat!(
    "--force-fieldtrials=A/G/ ",
    "--force-fieldtrial-params=Missing.G:k/v,A.Wrong:k/v,A.G:k/v",
  ));

  assert_eq!(trials.len(), 1);
  let params: Vec<_> = trials.get("A").unwrap().params.iter().collect();
  assert_eq!(params, [(&"k".to_string(), &"v".to_string())]);
}

#[test]
fn features_never_create_trials() {
  let trials = trials_from_command_line("--enable-features=Foo<A --disable-features=Bar<B");
  assert!(trials.is_empty());
}

#[test]
fn disable_wins_regardless_of_argument_order() {
  let trials = trials_from_command_line(
    "--disable-features=Foo<A --force-fieldtrials=A/G --enable-features=*Foo<A",
  );
  assert_eq!(trials.get("A").unwrap().feature("Foo"), Some(FeatureState::Disabled));
}

#[test]
fn repeated_switch_uses_last_value() {
  let trials = trials_from_command_line("--force-fieldtrials=A/G1 --force-fieldtrials=B/G2");
  assert!(!trials.contains("A"));
  assert_eq!(trials.get("B").unwrap().group, "G2");
}

#[test]
fn unterminated_quote_keeps_partial_argument() {
  let trials = trials_from_command_line("--force-fieldtrials='A/G/B/G2");
  assert_eq!(trials.len(), 2);
  assert_eq!(trials.get("B").unwrap().group, "G2");
}

#[test]
fn garbage_input() {
  for input in ["", "   ", "'", "\"\\", "--", "--=", "--force-fieldtrials", "%%%"] {
    assert!(trials_from_command_line(input).is_empty(), "input {input:?}");
  }
}

quickcheck::quickcheck! {
    fn pipeline_is_deterministic(input: String) -> bool {
        trials_from_command_line(&input) == trials_from_command_line(&input)
    }

    fn only_declared_trials_appear(trials: String, features: String) -> bool {
        let declared = trials_from_command_line(&format!("--force-fieldtrials={trials:?}"));
        let full = trials_from_command_line(&format!(
            "--force-fieldtrials={trials:?} --enable-features={features:?} --disable-features={features:?}"
        ));
        full.iter().map(|(name, _)| name).eq(declared.iter().map(|(name, _)| name))
    }
}
