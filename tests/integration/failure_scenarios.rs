//! Failure handling: every group is attempted once, failures stay local

use assert_matches::assert_matches;
use nrdp_reporter::{
    error::{EncodingError, GroupError, TransportError},
    nrdp::{ReceiverClient, SubmissionOutcome},
    walker::MetricWalker,
};
use wiremock::ResponseTemplate;

use crate::helpers::*;

#[tokio::test]
async fn test_http_error_does_not_stop_traversal() {
    let receiver = start_receiver(ResponseTemplate::new(503)).await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), true)
        .await;

    assert_eq!(report.groups.len(), 3);
    assert_eq!(report.failed(), 3);
    for group in &report.groups {
        assert_matches!(
            &group.result,
            Ok(SubmissionOutcome::TransportError(TransportError::Status(status)))
                if status.as_u16() == 503
        );
    }

    // one attempt per group, no retries
    assert_eq!(submitted_forms(&receiver).await.len(), 3);
}

#[tokio::test]
async fn test_rejected_submission_carries_receiver_message() {
    let receiver = start_receiver(
        ResponseTemplate::new(200)
            .set_body_string("<result><status>-1</status><message>BAD TOKEN</message></result>"),
    )
    .await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), false)
        .await;

    assert_matches!(
        &report.groups[0].result,
        Ok(SubmissionOutcome::ReceiverRejected { message }) if message == "BAD TOKEN"
    );
}

#[tokio::test]
async fn test_unparseable_answer_is_transport_error() {
    let receiver =
        start_receiver(ResponseTemplate::new(200).set_body_string("<result><status>")).await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), false)
        .await;

    assert_matches!(
        &report.groups[0].result,
        Ok(SubmissionOutcome::TransportError(_))
    );
}

#[tokio::test]
async fn test_encoding_error_only_affects_its_group() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let mut tree = three_group_tree();
    tree.process_group_status[0].name = "broken\u{0}name".to_string();

    let report = MetricWalker::new(&config, &client).run(&tree, true).await;

    assert!(report.groups[0].is_success());
    assert_matches!(
        &report.groups[1].result,
        Err(GroupError::Encoding(EncodingError::InvalidCharacter {
            field: "servicename",
            ..
        }))
    );
    assert!(report.groups[2].is_success());

    assert_eq!(submitted_forms(&receiver).await.len(), 2);
}

#[tokio::test]
async fn test_unreachable_receiver() {
    let config = create_test_config("http://127.0.0.1:9/nrdp/".to_string());
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run(&three_group_tree(), true)
        .await;

    assert_eq!(report.failed(), 3);
    assert_matches!(
        &report.groups[0].result,
        Ok(SubmissionOutcome::TransportError(TransportError::Request(_)))
    );
}

#[tokio::test]
async fn test_hostname_failure_submits_nothing() {
    let receiver = start_accepting_receiver().await;
    let config = create_test_config(receiver_url(&receiver));
    let client = ReceiverClient::new();

    let report = MetricWalker::new(&config, &client)
        .run_with_host(&three_group_tree(), true, Err("no such host".to_string()))
        .await;

    assert_eq!(report.groups.len(), 3);
    assert_eq!(report.failed(), 3);
    for group in &report.groups {
        assert_matches!(
            &group.result,
            Err(GroupError::Hostname(reason)) if reason == "no such host"
        );
        assert_eq!(group.check_results, 0);
    }

    assert!(submitted_forms(&receiver).await.is_empty());
}
