#![allow(clippy::unwrap_used)]
// HTTP-level tests for the `FmcClient` collaborator implementations.

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fmcly_core::{
    AccessRuleBuilder, ControllerConfig, ControllerVersion, CoreError, Direction, FmcClient,
    ObjectCategory, ParentPolicy, Resolver, RulePosition, SetAction, TlsVerification, connect,
};

const DOMAIN: &str = "dom-1";

async fn setup(version: Option<&str>) -> (MockServer, FmcClient) {
    let server = MockServer::start().await;
    let mut client = FmcClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        DOMAIN.into(),
    );
    if let Some(version) = version {
        client = client.with_server_version(version);
    }
    (server, client)
}

fn config_path(suffix: &str) -> String {
    format!("/api/fmc_config/v1/domain/{DOMAIN}/{suffix}")
}

async fn mount_items(server: &MockServer, suffix: &str, items: serde_json::Value) {
    let count = items.as_array().map_or(0, Vec::len);
    Mock::given(method("GET"))
        .and(path(config_path(suffix)))
        .and(query_param("expanded", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": items,
            "paging": {"offset": 0, "limit": 1000, "count": count, "pages": 1}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn find_by_name_matches_exact_name() {
    let (server, client) = setup(None).await;
    mount_items(
        &server,
        "object/securityzones",
        json!([
            {"name": "inside-dmz", "id": "z0", "type": "SecurityZone"},
            {"name": "inside", "id": "z1", "type": "SecurityZone"}
        ]),
    )
    .await;

    let found = client
        .find_by_name(ObjectCategory::SecurityZone, "inside")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.reference.id, "z1");
    assert_eq!(found.member_count, 0);

    let missing = client
        .find_by_name(ObjectCategory::SecurityZone, "outside")
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn interface_groups_report_members() {
    let (server, client) = setup(None).await;
    mount_items(
        &server,
        "object/interfaceobjects",
        json!([{
            "name": "lan-group",
            "id": "ig-1",
            "type": "InterfaceGroup",
            "interfaces": [{"name": "Gi0/1"}, {"name": "Gi0/2"}]
        }]),
    )
    .await;

    let found = client
        .find_by_name(ObjectCategory::Interface, "lan-group")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.member_count, 2);
    assert!(found.is_multi_member_group());
}

#[tokio::test]
async fn lookup_errors_propagate() {
    let (server, client) = setup(None).await;
    Mock::given(method("GET"))
        .and(path(config_path("object/vlantags")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client
        .find_by_name(ObjectCategory::VlanTag, "vlan100")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Transport(fmcly_api::Error::TokenExpired)
    ));
}

#[tokio::test]
async fn server_version_is_parsed() {
    let (_server, client) = setup(Some("6.4.0 (build 102)")).await;
    assert_eq!(
        Resolver::server_version(&client),
        Some(ControllerVersion::new(6, 4, 0))
    );
}

#[tokio::test]
async fn access_rule_over_http() {
    let (server, client) = setup(Some("6.7.0")).await;
    mount_items(
        &server,
        "policy/accesspolicies",
        json!([{"name": "Branch ACP", "id": "acp-1", "type": "AccessPolicy"}]),
    )
    .await;
    mount_items(&server, "object/networkaddresses", json!([])).await;
    mount_items(&server, "object/networkgroups", json!([])).await;
    mount_items(
        &server,
        "object/fqdns",
        json!([{"name": "updates", "id": "f-1", "type": "FQDN"}]),
    )
    .await;

    let expected = json!({
        "name": "updates",
        "type": "AccessRule",
        "action": "ALLOW",
        "enabled": true,
        "sendEventsToFMC": true,
        "logFiles": false,
        "logBegin": false,
        "logEnd": false,
        "destinationNetworks": {
            "objects": [{"name": "updates", "id": "f-1", "type": "FQDN"}],
            "literals": []
        }
    });
    Mock::given(method("POST"))
        .and(path(config_path("policy/accesspolicies/acp-1/accessrules")))
        .and(query_param("insertBefore", "1"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "r-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let position = RulePosition {
        insert_before: Some(1),
        ..RulePosition::default()
    };
    let mut rule = AccessRuleBuilder::new(&client, "updates", position);
    rule.set_parent_policy(ParentPolicy::Name("Branch ACP".into()))
        .await
        .unwrap();
    rule.network(Direction::Destination, SetAction::Add, Some("updates"), None)
        .await
        .unwrap();
    rule.set_action("ALLOW");
    rule.create(&client).await.unwrap();

    assert_eq!(rule.rule().id.as_deref(), Some("r-1"));
    assert!(rule.warnings().is_empty());
}

#[tokio::test]
async fn connect_logs_in_and_scopes_domain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/fmc_platform/v1/auth/generatetoken"))
        .respond_with(
            ResponseTemplate::new(204)
                .insert_header("X-auth-access-token", "tok")
                .insert_header("DOMAIN_UUID", DOMAIN)
                .insert_header("DOMAINS", r#"[{"name":"Global","uuid":"dom-1"}]"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/fmc_platform/v1/info/serverversion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"serverVersion": "7.0.1"}],
            "paging": {"offset": 0, "limit": 25, "count": 1, "pages": 1}
        })))
        .mount(&server)
        .await;

    let mut config = ControllerConfig::new(
        Url::parse(&server.uri()).unwrap(),
        "api-user",
        "secret".to_string().into(),
    );
    config.tls = TlsVerification::DangerAcceptInvalid;

    let client = connect(&config).await.unwrap();
    assert_eq!(client.domain_uuid(), DOMAIN);
    assert_eq!(
        Resolver::server_version(&client),
        Some(ControllerVersion::new(7, 0, 1))
    );
}

#[tokio::test]
async fn connect_requires_credentials() {
    let config = ControllerConfig::new(
        Url::parse("https://fmc.invalid").unwrap(),
        "",
        "secret".to_string().into(),
    );
    assert!(matches!(
        connect(&config).await,
        Err(CoreError::Config { .. })
    ));
}
