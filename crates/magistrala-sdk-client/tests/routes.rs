//! Route tests for the entity clients.
//!
//! Each test pins the verb, path, credential and body of one operation
//! against a wiremock server standing in for every service.

use magistrala_sdk_client::{Sdk, SdkConfig};
use magistrala_sdk_core::defs::{
    BootstrapConfig, Credentials, PageMetadata, Relation, Role, User,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, Sdk) {
    let server = MockServer::start().await;
    let sdk = Sdk::new(SdkConfig::with_host(server.uri())).unwrap();
    (server, sdk)
}

fn user_json() -> serde_json::Value {
    json!({"id": "u1", "name": "admin"})
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// Roles

#[tokio::test]
async fn roles_list_available_actions() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/domains/roles/available-actions"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"available_actions": ["read", "update"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = sdk.service_url("domains").unwrap();
    let actions = sdk
        .roles
        .list_available_actions(&base, "domains", "tok")
        .await
        .unwrap();

    assert_eq!(actions.available_actions, strings(&["read", "update"]));
}

#[tokio::test]
async fn roles_create_sends_optional_lists() {
    let (server, sdk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/d1/channels/c1/roles"))
        .and(body_json(json!({
            "role_name": "publisher",
            "optional_actions": ["publish"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "role_id": "r1",
            "role_name": "publisher",
            "entity_id": "c1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = sdk.service_url("channels").unwrap();
    let actions = strings(&["publish"]);
    let role = sdk
        .roles
        .create(&base, "d1/channels", "c1", "publisher", Some(actions.as_slice()), None, "tok")
        .await
        .unwrap();

    assert_eq!(role.role_id.as_deref(), Some("r1"));
    assert_eq!(role.entity_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn roles_list_forwards_page_query() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/d1/groups/g1/roles"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "roles": [{"role_name": "admin"}],
            "total": 1,
            "offset": 0,
            "limit": 10
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = sdk.service_url("groups").unwrap();
    let pm = PageMetadata {
        offset: Some(0),
        limit: Some(10),
        ..Default::default()
    };
    let page = sdk
        .roles
        .list(&base, "d1/groups", "g1", &pm, "tok")
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.roles[0].role_name.as_deref(), Some("admin"));
}

#[tokio::test]
async fn roles_view_by_name() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/domains/d1/roles/admin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"role_name": "admin"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = sdk.service_url("domains").unwrap();
    let role = sdk
        .roles
        .view(&base, "domains", "d1", "admin", "tok")
        .await
        .unwrap();

    assert_eq!(role.role_name.as_deref(), Some("admin"));
}

#[tokio::test]
async fn roles_update_puts_role() {
    let (server, sdk) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/d1/things/t1/roles/viewer"))
        .and(body_json(json!({"role_name": "reader"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"role_name": "reader"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let base = sdk.service_url("things").unwrap();
    let role = Role {
        role_name: Some("reader".to_string()),
        ..Default::default()
    };
    let updated = sdk
        .roles
        .update(&base, "d1/things", "t1", "viewer", &role, "tok")
        .await
        .unwrap();

    assert_eq!(updated.role_name.as_deref(), Some("reader"));
}

// Users

#[tokio::test]
async fn users_search_forwards_query() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("name", "adm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [user_json()],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pm = PageMetadata {
        name: Some("adm".to_string()),
        ..Default::default()
    };
    let page = sdk.users.search(&pm, "tok").await.unwrap();

    assert_eq!(page.users.len(), 1);
}

#[tokio::test]
async fn users_update_tags_patches_tags_route() {
    let (server, sdk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/users/u1/tags"))
        .and(body_json(json!({"id": "u1", "tags": ["ops"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = User {
        id: Some("u1".to_string()),
        tags: Some(strings(&["ops"])),
        ..Default::default()
    };
    sdk.users.update_tags(&user, "tok").await.unwrap();
}

#[tokio::test]
async fn users_update_email_patches_email_route() {
    let (server, sdk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/users/u1/email"))
        .and(body_json(json!({
            "id": "u1",
            "credentials": {"identity": "new@example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = User {
        id: Some("u1".to_string()),
        credentials: Some(Credentials {
            identity: Some("new@example.com".to_string()),
            secret: None,
        }),
        ..Default::default()
    };
    sdk.users.update_email(&user, "tok").await.unwrap();
}

#[tokio::test]
async fn users_update_role_patches_role_route() {
    let (server, sdk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/users/u1/role"))
        .and(body_json(json!({"id": "u1", "role": "admin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = User {
        id: Some("u1".to_string()),
        role: Some("admin".to_string()),
        ..Default::default()
    };
    sdk.users.update_role(&user, "tok").await.unwrap();
}

#[tokio::test]
async fn users_update_secret() {
    let (server, sdk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/users/secret"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"old_secret": "old-pass", "new_secret": "new-pass"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&server)
        .await;

    let user = sdk
        .users
        .update_secret("old-pass", "new-pass", "tok")
        .await
        .unwrap();
    assert_eq!(user.id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn users_reset_password_request_sets_referer() {
    let (server, sdk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/password/reset-request"))
        .and(header("referer", "http://ui.example.com"))
        .and(body_json(json!({
            "email": "admin@example.com",
            "host": "http://ui.example.com"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let resp = sdk
        .users
        .reset_password_request("admin@example.com", "http://ui.example.com")
        .await
        .unwrap();

    assert_eq!(resp.status, 201);
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn users_reset_password() {
    let (server, sdk) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/password/reset"))
        .and(body_json(json!({
            "password": "n3w-pass",
            "confirm_password": "n3w-pass",
            "token": "reset-token"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let resp = sdk
        .users
        .reset_password("n3w-pass", "n3w-pass", "reset-token")
        .await
        .unwrap();

    assert_eq!(resp.message.as_deref(), Some("Password reset successfully"));
}

// Groups

#[tokio::test]
async fn groups_parents_and_children() {
    let (server, sdk) = setup().await;

    for relation in ["parents", "children"] {
        Mock::given(method("GET"))
            .and(path(format!("/d1/groups/g1/{relation}")))
            .and(query_param("level", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "groups": [{"id": "g2"}],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let pm = PageMetadata {
        level: Some(2),
        ..Default::default()
    };
    let parents = sdk.groups.parents("d1", "g1", &pm, "tok").await.unwrap();
    let children = sdk.groups.children("d1", "g1", &pm, "tok").await.unwrap();

    assert_eq!(parents.groups[0].id.as_deref(), Some("g2"));
    assert_eq!(children.total, 1);
}

// Domains

#[tokio::test]
async fn domains_freeze() {
    let (server, sdk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/domains/d1/freeze"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let resp = sdk.domains.freeze("d1", "tok").await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("Domain frozen successfully"));
}

#[tokio::test]
async fn domains_permissions() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/domains/d1/permissions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"permissions": ["admin", "membership"]})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let permissions = sdk.domains.permissions("d1", "tok").await.unwrap();
    assert_eq!(permissions.permissions, strings(&["admin", "membership"]));
}

#[tokio::test]
async fn domains_send_invitation() {
    let (server, sdk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/domains/d1/invitations"))
        .and(body_json(json!({"user_id": "u2", "relation": "contributor"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let resp = sdk
        .domains
        .send_invitation("d1", "u2", Relation::Contributor, "tok")
        .await
        .unwrap();
    assert_eq!(resp.status, 201);
}

#[tokio::test]
async fn domains_list_invitations() {
    let (server, sdk) = setup().await;

    Mock::given(method("GET"))
        .and(path("/domains/d1/invitations"))
        .and(query_param("user_id", "u2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invitations": [{"user_id": "u2", "domain_id": "d1", "relation": "guest"}],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let pm = PageMetadata {
        user_id: Some("u2".to_string()),
        ..Default::default()
    };
    let page = sdk.domains.list_invitations("d1", &pm, "tok").await.unwrap();

    assert_eq!(page.invitations[0].relation, Some(Relation::Guest));
}

#[tokio::test]
async fn domains_accept_invitation() {
    let (server, sdk) = setup().await;

    Mock::given(method("POST"))
        .and(path("/domains/d1/invitations/accept"))
        .and(header("authorization", "Bearer invitee"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let resp = sdk.domains.accept_invitation("d1", "invitee").await.unwrap();
    assert_eq!(resp.status, 204);
}

// Bootstrap

#[tokio::test]
async fn bootstrap_update_omits_absent_fields() {
    let (server, sdk) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/d1/things/configs/t1"))
        .and(body_json(json!({"name": "gateway"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = BootstrapConfig {
        thing_id: Some("t1".to_string()),
        name: Some("gateway".to_string()),
        ..Default::default()
    };
    sdk.bootstrap.update("d1", &config, "tok").await.unwrap();
}

#[tokio::test]
async fn bootstrap_update_certs() {
    let (server, sdk) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/d1/things/configs/certs/t1"))
        .and(body_json(json!({
            "client_cert": "cert",
            "client_key": "key",
            "ca_cert": "ca"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "thing_id": "t1",
            "client_cert": "cert"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = sdk
        .bootstrap
        .update_certs("d1", "t1", "cert", "key", "ca", "tok")
        .await
        .unwrap();

    assert_eq!(config.client_cert.as_deref(), Some("cert"));
}

#[tokio::test]
async fn bootstrap_update_connections() {
    let (server, sdk) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/d1/things/configs/connections/t1"))
        .and(body_json(json!({"channels": ["c1", "c2"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    sdk.bootstrap
        .update_connections("d1", "t1", &strings(&["c1", "c2"]), "tok")
        .await
        .unwrap();
}
