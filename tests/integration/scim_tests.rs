//! SCIM resource workflows against the fake server.

use serde_json::json;
use uaa::api::{GroupMapping, MappingIdentifier, ScimValue, UaaGroup, UaaUser, UserName};
use uaa::{ErrorKind, FilterRequest, FilterRequestBuilder};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{FakeUaa, admin_credentials, page};

#[tokio::test]
async fn test_user_lifecycle() {
    let uaa = FakeUaa::start().await;
    uaa.issue_token("admin-token", 1).await;

    Mock::given(method("POST"))
        .and(path("/Users"))
        .and(body_partial_json(json!({
            "userName": "marissa",
            "name": {"givenName": "Marissa", "familyName": "Bloggs"},
            "emails": [{"value": "marissa@example.com", "primary": true}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "u-1",
            "userName": "marissa",
            "meta": {"version": 0},
            "emails": [{"value": "marissa@example.com", "primary": true}],
            "active": true
        })))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("attributes", "id"))
        .and(query_param("filter", r#"userName eq "marissa""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![json!({"id": "u-1"})])))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/Users/u-1/password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/Users/u-1"))
        .and(header("if-match", "0"))
        .and(body_partial_json(json!({"active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "userName": "marissa",
            "meta": {"version": 1},
            "active": false
        })))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/Users/u-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "u-1"})))
        .expect(1)
        .mount(&uaa.server)
        .await;

    let users = uaa.client(admin_credentials()).users();

    let mut user = UaaUser::new("marissa");
    user.name = Some(UserName::new("Marissa", "Bloggs"));
    user.emails = vec![ScimValue::primary("marissa@example.com")];
    user.password = Some("koala".into());

    let mut created = users.create(&user).await.unwrap();
    assert_eq!(created.primary_email(), Some("marissa@example.com"));

    let id = users.user_id_by_name("marissa").await.unwrap();
    assert_eq!(created.id.as_deref(), Some(id.as_str()));

    users.change_password(&id, "wombat").await.unwrap();

    created.active = Some(false);
    let updated = users.update(&created).await.unwrap();
    assert_eq!(updated.meta.and_then(|m| m.version), Some(1));

    users.delete(&id).await.unwrap();
}

#[tokio::test]
async fn test_user_id_by_name_distinguishes_absent_from_failed() {
    let uaa = FakeUaa::start().await;
    uaa.issue_token("admin-token", 1).await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("filter", r#"userName eq "nobody""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .mount(&uaa.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("filter", r#"userName eq "broken""#))
        .respond_with(ResponseTemplate::new(503))
        .mount(&uaa.server)
        .await;

    let users = uaa.client(admin_credentials()).users();

    let absent = users.user_id_by_name("nobody").await.unwrap_err();
    assert_eq!(absent.kind(), ErrorKind::NotFound);

    let failed = users.user_id_by_name("broken").await.unwrap_err();
    assert_eq!(failed.kind(), ErrorKind::Lookup);
}

#[tokio::test]
async fn test_group_rename_and_mapping() {
    let uaa = FakeUaa::start().await;
    uaa.issue_token("admin-token", 1).await;

    Mock::given(method("POST"))
        .and(path("/Groups"))
        .and(body_partial_json(json!({
            "schemas": ["urn:scim:schemas:core:1.0"],
            "displayName": "reports.read"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "g-1",
            "displayName": "reports.read",
            "meta": {"version": 0}
        })))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Groups"))
        .and(query_param("filter", r#"id eq "g-1""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![json!({
            "id": "g-1",
            "displayName": "reports.read",
            "meta": {"version": 0}
        })])))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/Groups/g-1"))
        .and(header("if-match", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "g-1",
            "displayName": "reports.view",
            "meta": {"version": 1}
        })))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("POST"))
        .and(path("/Groups/External"))
        .and(body_partial_json(json!({
            "groupId": "g-1",
            "externalGroup": "cn=analysts,dc=example,dc=com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "groupId": "g-1",
            "displayName": "reports.view",
            "externalGroup": "cn=analysts,dc=example,dc=com",
            "origin": "ldap"
        })))
        .expect(1)
        .mount(&uaa.server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/Groups/External/groupId/g-1/externalGroup/cn%3Danalysts%2Cdc%3Dexample%2Cdc%3Dcom/origin/ldap"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groupId": "g-1"})))
        .expect(1)
        .mount(&uaa.server)
        .await;

    let groups = uaa.client(admin_credentials()).groups();

    let group = groups.create(&UaaGroup::new("reports.read")).await.unwrap();
    let id = group.id.unwrap();

    let renamed = groups.update_name(&id, "reports.view").await.unwrap();
    assert_eq!(renamed.display_name, "reports.view");

    let mapping: GroupMapping = groups
        .create_mapping(MappingIdentifier::GroupId, &id, "cn=analysts,dc=example,dc=com")
        .await
        .unwrap();
    assert_eq!(mapping.identifier(), Some((MappingIdentifier::GroupId, "g-1")));

    groups.delete_mapping(&mapping).await.unwrap();
}

#[tokio::test]
async fn test_paging_through_users() {
    let uaa = FakeUaa::start().await;
    uaa.issue_token("admin-token", 1).await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("startIndex", "1"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"userName": "a"}, {"userName": "b"}],
            "startIndex": 1,
            "itemsPerPage": 2,
            "totalResults": 3
        })))
        .mount(&uaa.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/Users"))
        .and(query_param("startIndex", "3"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"userName": "c"}],
            "startIndex": 3,
            "itemsPerPage": 2,
            "totalResults": 3
        })))
        .mount(&uaa.server)
        .await;

    let users = uaa.client(admin_credentials()).users();
    let mut names = Vec::new();
    let mut start = 1;

    loop {
        let request = FilterRequestBuilder::new().start(start).unwrap().count(2).unwrap().build().unwrap();
        let page = users.list(&request).await.unwrap();
        names.extend(page.resources.iter().map(|u| u.user_name.clone()));
        if !page.has_more() {
            break;
        }
        start += page.len() as u32;
    }

    assert_eq!(names, ["a", "b", "c"]);
}

#[tokio::test]
async fn test_client_registrations() {
    let uaa = FakeUaa::start().await;
    uaa.issue_token("admin-token", 1).await;

    Mock::given(method("GET"))
        .and(path("/oauth/clients"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": [{"client_id": "cf"}, {"client_id": "admin"}],
            "startIndex": 1,
            "itemsPerPage": 100,
            "totalResults": 2
        })))
        .mount(&uaa.server)
        .await;

    let page = uaa.client(admin_credentials()).clients().list(&FilterRequest::show_all()).await.unwrap();
    let ids: Vec<_> = page.resources.iter().map(|c| c.client_id.as_str()).collect();
    assert_eq!(ids, ["cf", "admin"]);
}
