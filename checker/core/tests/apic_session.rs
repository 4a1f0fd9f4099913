// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Resolution over HTTP against a mock controller.

use checker_core::application::{ResolutionRequest, ResolutionSession, TagOrigin};
use checker_core::infrastructure::ApicClient;
use mockito::Matcher;

const LOGIN: &str = r#"{"totalCount":"1","imdata":[{"aaaLogin":{"attributes":{"token":"abc"}}}]}"#;

const RULES: &str = r#"{"totalCount":"2","imdata":[
  {"actrlRule":{"attributes":{"dn":"topology/pod-1/node-101/sys/actrl/scope-2818048/rule-1","id":"4101","sPcTag":"49153","dPcTag":"49154","scopeId":"2818048","fltId":"5","ctrctName":"A:web","direction":"bi-dir","operSt":"enabled","action":"permit","prio":"fully_qual"}}},
  {"actrlRule":{"attributes":{"dn":"topology/pod-1/node-101/sys/actrl/scope-2818048/rule-2","id":"4100","sPcTag":"any","dPcTag":"any","scopeId":"2818048","fltId":"implicit","ctrctName":"","direction":"uni-dir","operSt":"enabled","action":"deny,log","prio":"any_any_any"}}}
]}"#;

const VRFS: &str = r#"{"totalCount":"1","imdata":[
  {"fvCtx":{"attributes":{"dn":"uni/tn-A/ctx-default","scope":"2818048","pcTag":"32770"}}}
]}"#;

const GROUPS: &str = r#"{"totalCount":"2","imdata":[
  {"fvEpP":{"attributes":{"scopeId":"2818048","pcTag":"49153","epgPKey":"uni/tn-A/ap-app/epg-web"}}},
  {"fvEpP":{"attributes":{"scopeId":"2818048","pcTag":"49154","epgPKey":"uni/tn-A/ap-app/epg-db"}}}
]}"#;

async fn json_get(server: &mut mockito::ServerGuard, path: &str, body: &str) -> mockito::Mock {
    server
        .mock("GET", path)
        .match_header("cookie", "APIC-cookie=abc")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn resolves_over_http_and_tolerates_missing_classes() {
    let mut server = mockito::Server::new_async().await;
    let _login = server
        .mock("POST", "/api/aaaLogin.json")
        .with_status(200)
        .with_body(LOGIN)
        .create_async()
        .await;
    let rules = json_get(&mut server, "/api/node/class/topology/pod-1/node-101/actrlRule.json", RULES).await;
    let vrfs = json_get(&mut server, "/api/node/class/fvCtx.json", VRFS).await;
    let groups = json_get(&mut server, "/api/node/class/fvAREpP.json", GROUPS).await;

    let client = ApicClient::new(server.url(), false).unwrap();
    client.login("admin", "secret").await.unwrap();

    let report = ResolutionSession::new(&client, 2000)
        .resolve(ResolutionRequest::node(1, 101))
        .await;

    rules.assert_async().await;
    vrfs.assert_async().await;
    groups.assert_async().await;

    assert_eq!(report.rules.len(), 2);
    assert_eq!(report.rules[0].rule.id, "4101");
    assert_eq!(report.rules[0].source.origin, TagOrigin::Local);
    assert_eq!(report.rules[0].destination.name, "uni/tn-A/ap-app/epg-db");
    assert_eq!(report.rules[1].filter_name(), "implicit");
}
