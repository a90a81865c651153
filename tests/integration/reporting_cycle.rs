//! Complete reporting cycles: evaluation, encoding and submission per group

use std::io::Write;

use nrdp_reporter::{
    config::read_config_file,
    metrics::Metric,
    monitors::threshold::MetricMode,
    nrdp::{ReceiverClient, SubmissionOutcome},
    walker::MetricWalker,
};
use pretty_assertions::assert_eq;

use crate::helpers::*;

#[tokio::test]
async fn test_recursive_cycle_submits_one_batch_per_group_in_pre_order() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), true)
        .await;

    let groups: Vec<_> = report.groups.iter().map(|g| g.group.as_str()).collect();
    assert_eq!(groups, vec!["root", "child-a", "child-b"]);
    assert_eq!(report.succeeded(), 3);

    let forms = submitted_forms(&receiver).await;
    assert_eq!(forms.len(), 3);

    let first_services: Vec<_> = forms
        .iter()
        .map(|form| element_texts(form_field(form, "XMLDATA").unwrap(), "servicename")[0].clone())
        .collect();
    assert_eq!(
        first_services,
        vec![
            "root - NiFi Active Thread Count",
            "child-a - NiFi Active Thread Count",
            "child-b - NiFi Active Thread Count",
        ]
    );
}

#[tokio::test]
async fn test_non_recursive_cycle_only_reports_root() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), false)
        .await;

    assert_eq!(report.groups.len(), 1);
    assert_eq!(submitted_forms(&receiver).await.len(), 1);
}

#[tokio::test]
async fn test_states_and_outputs_on_the_wire() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    MetricWalker::new(&config, &client)
        .run(&three_group_tree(), true)
        .await;

    let forms = submitted_forms(&receiver).await;
    let payloads: Vec<_> = forms
        .iter()
        .map(|form| form_field(form, "XMLDATA").unwrap().to_string())
        .collect();

    // active thread count (reporting) first, flowfiles queued (alerting) second
    let states: Vec<_> = payloads
        .iter()
        .map(|xml| element_texts(xml, "state"))
        .collect();
    assert_eq!(
        states,
        vec![vec!["0", "0"], vec!["0", "1"], vec!["0", "2"]]
    );

    let outputs = element_texts(&payloads[2], "output");
    assert_eq!(
        outputs,
        vec![
            "ACTIVE THREAD COUNT OK - 1 active threads | active_thread_count=1",
            "FLOWFILES QUEUED CRIT - 250 flowfiles queued | flowfiles_queued=250",
        ]
    );

    for xml in &payloads {
        assert_eq!(element_texts(xml, "hostname"), vec!["nifi-01", "nifi-01"]);
        assert!(xml.contains(r#"<checkresult checktype="1" type="service">"#));
    }
}

#[tokio::test]
async fn test_form_carries_token_and_command() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    MetricWalker::new(&config, &client)
        .run(&three_group_tree(), false)
        .await;

    let forms = submitted_forms(&receiver).await;
    let keys: Vec<_> = forms[0].iter().map(|(key, _)| key.as_str()).collect();

    assert_eq!(keys, vec!["token", "cmd", "XMLDATA"]);
    assert_eq!(form_field(&forms[0], "token"), Some("test-token"));
    assert_eq!(form_field(&forms[0], "cmd"), Some("submitcheck"));
}

#[tokio::test]
async fn test_all_metrics_disabled_still_submits_empty_document() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver))
        .with_mode(Metric::ActiveThreadCount, MetricMode::Disabled)
        .with_mode(Metric::FlowfilesQueued, MetricMode::Disabled);
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), false)
        .await;

    assert_eq!(report.groups[0].check_results, 0);

    let forms = submitted_forms(&receiver).await;
    let xml = form_field(&forms[0], "XMLDATA").unwrap();
    assert!(xml.ends_with("<checkresults></checkresults>"));
}

#[tokio::test]
async fn test_cycle_from_config_file() {
    let receiver = start_accepting_receiver().await;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "receiver": {{ "url": "{}", "token": "from-file" }},
            "hostname": "nifi-02",
            "performance_data": false,
            "metrics": {{
                "bytes_queued": {{ "mode": "alerting", "warning": "1 KB", "critical": "1 MB" }}
            }}
        }}"#,
        receiver_url(&receiver)
    )
    .unwrap();

    let config = read_config_file(file.path().to_str().unwrap())
        .unwrap()
        .validate()
        .unwrap();
    let client = ReceiverClient::new();

    let mut root = three_group_tree();
    root.queued_content_size = 2048;

    let report = MetricWalker::new(&config, &client)
        .run(&root, config.report_all_groups)
        .await;
    assert_eq!(report.groups.len(), 3);

    let forms = submitted_forms(&receiver).await;
    assert_eq!(form_field(&forms[0], "token"), Some("from-file"));

    let xml = form_field(&forms[0], "XMLDATA").unwrap();
    assert_eq!(element_texts(xml, "servicename"), vec!["root - NiFi Data Queued"]);
    assert_eq!(element_texts(xml, "hostname"), vec!["nifi-02"]);
    assert_eq!(element_texts(xml, "state"), vec!["1"]);
    assert_eq!(
        element_texts(xml, "output"),
        vec!["BYTES QUEUED WARN - 2 KB queued"]
    );

    assert!(matches!(
        report.groups[0].result,
        Ok(SubmissionOutcome::Success)
    ));
}
