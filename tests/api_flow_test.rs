//! # HTTP 接口集成测试
//!
//! 通过完整路由器驱动注册、登录与密钥生命周期，校验响应信封

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use llm_portal::AppContext;
use llm_portal::management::create_router;
use llm_portal::testing::{create_test_context, insert_user};
use pretty_assertions::assert_eq;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

/// 接口测试套件
struct ApiTestSuite {
    context: Arc<AppContext>,
    router: Router,
}

impl ApiTestSuite {
    async fn setup() -> Self {
        let context = create_test_context().await.expect("test context");
        let router = create_router(context.clone());
        Self { context, router }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn register(&self, user_name: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/user/register",
                None,
                Some(json!({"user_name": user_name, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn login(&self, user_name: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/user/login",
                None,
                Some(json!({"user_name": user_name, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    /// 注册并登录，返回 (uid, token)
    async fn signed_in(&self, user_name: &str) -> (i64, String) {
        self.register(user_name, "password").await;
        let body = self.login(user_name, "password").await;
        let uid = body["data"]["uid"].as_i64().unwrap();
        let token = body["data"]["token"].as_str().unwrap().to_string();
        (uid, token)
    }

    async fn generate(&self, uid: i64, token: &str) -> Value {
        let uri = format!("/api/v1/user/{uid}/key/generate");
        let (status, body) = self.send(Method::POST, &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn list(&self, uid: i64, token: &str) -> Value {
        let uri = format!("/api/v1/user/{uid}/keys");
        let (status, body) = self.send(Method::GET, &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    async fn delete(&self, uid: i64, secret: &str, token: &str) -> Value {
        let uri = format!("/api/v1/user/{uid}/key/delete?api_key_secret={secret}");
        let (status, body) = self.send(Method::DELETE, &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK);
        body
    }
}

async fn ak_num(db: &DatabaseConnection, uid: i32) -> i32 {
    entity::Users::find_by_id(uid)
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .ak_num
}

#[tokio::test]
async fn register_twice_reports_conflict() {
    let suite = ApiTestSuite::setup().await;

    let first = suite.register("alice", "pw").await;
    assert_eq!(
        first,
        json!({"code": 0, "status": "success", "message": "Register successfully"})
    );

    let second = suite.register("alice", "pw").await;
    assert_eq!(
        second,
        json!({"code": 1, "status": "error", "message": "User already exist"})
    );
}

#[tokio::test]
async fn login_failures_are_identical() {
    let suite = ApiTestSuite::setup().await;
    suite.register("alice", "right").await;

    let wrong_password = suite.login("alice", "wrong").await;
    let unknown_user = suite.login("nobody", "right").await;

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(
        wrong_password,
        json!({
            "code": 1,
            "status": "error",
            "message": "User not exist or password incorrect"
        })
    );
}

#[tokio::test]
async fn login_token_round_trips() {
    let suite = ApiTestSuite::setup().await;
    let (uid, token) = suite.signed_in("alice").await;

    let decoded = suite.context.tokens.decode(&token).unwrap();
    assert_eq!(decoded, (i32::try_from(uid).unwrap(), 0));
}

#[tokio::test]
async fn sixth_key_exceeds_quota() {
    let suite = ApiTestSuite::setup().await;
    let (uid, token) = suite.signed_in("alice").await;

    for _ in 0..5 {
        let body = suite.generate(uid, &token).await;
        assert_eq!(body["code"], 0);
        assert_eq!(
            body["message"],
            "Generate api key successfully. Please save it carefully."
        );
        assert_eq!(body["data"]["uid"], uid);
        assert!(body["data"]["api_key_secret"].as_str().unwrap().starts_with("sk-"));
        assert!(body["data"]["create_at"].is_string());
        assert!(body["data"]["expire_at"].is_string());
    }

    let sixth = suite.generate(uid, &token).await;
    assert_eq!(
        sixth,
        json!({
            "code": 1,
            "status": "error",
            "message": "You can only generate 5 api keys at most"
        })
    );
}

#[tokio::test]
async fn delete_removes_key_and_frees_quota() {
    let suite = ApiTestSuite::setup().await;
    let (uid, token) = suite.signed_in("alice").await;

    let mut secrets = Vec::new();
    for _ in 0..5 {
        let body = suite.generate(uid, &token).await;
        secrets.push(body["data"]["api_key_secret"].as_str().unwrap().to_string());
    }

    let deleted = suite.delete(uid, &secrets[0], &token).await;
    assert_eq!(
        deleted,
        json!({"code": 0, "status": "success", "message": "Delete api key successfully"})
    );

    let list = suite.list(uid, &token).await;
    assert_eq!(list["message"], "List api key successfully");
    assert_eq!(list["data"]["uid"], uid);
    let listed: Vec<&str> = list["data"]["api_key_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["api_key_secret"].as_str().unwrap())
        .collect();
    assert_eq!(listed.len(), 4);
    assert!(!listed.contains(&secrets[0].as_str()));

    // 删除后配额恢复一个
    assert_eq!(suite.generate(uid, &token).await["code"], 0);
    assert_eq!(suite.generate(uid, &token).await["code"], 1);
}

#[tokio::test]
async fn deleting_twice_reports_missing_key() {
    let suite = ApiTestSuite::setup().await;
    let (uid, token) = suite.signed_in("alice").await;
    let secret = suite.generate(uid, &token).await["data"]["api_key_secret"]
        .as_str()
        .unwrap()
        .to_string();

    assert_eq!(suite.delete(uid, &secret, &token).await["code"], 0);
    let again = suite.delete(uid, &secret, &token).await;
    assert_eq!(
        again,
        json!({"code": 1, "status": "error", "message": "Key not exist"})
    );
}

#[tokio::test]
async fn foreign_access_needs_admin() {
    let suite = ApiTestSuite::setup().await;
    let (alice, alice_token) = suite.signed_in("alice").await;
    let (_, bob_token) = suite.signed_in("bob").await;
    let secret = suite.generate(alice, &alice_token).await["data"]["api_key_secret"]
        .as_str()
        .unwrap()
        .to_string();

    let no_permission = json!({"code": 1, "status": "error", "message": "No permission"});
    assert_eq!(suite.list(alice, &bob_token).await, no_permission);
    assert_eq!(suite.delete(alice, &secret, &bob_token).await, no_permission);

    insert_user(suite.context.db.connection(), "root", "rootpw", true)
        .await
        .unwrap();
    let admin_token = suite.login("root", "rootpw").await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let list = suite.list(alice, &admin_token).await;
    assert_eq!(list["code"], 0);
    assert_eq!(list["data"]["api_key_list"].as_array().unwrap().len(), 1);

    // 管理员不能替他人生成密钥
    assert_eq!(suite.generate(alice, &admin_token).await, no_permission);

    assert_eq!(suite.delete(alice, &secret, &admin_token).await["code"], 0);
    assert_eq!(
        suite.list(alice, &alice_token).await["data"]["api_key_list"],
        json!([])
    );
}

#[tokio::test]
async fn admin_delete_under_own_uid_updates_owner() {
    let suite = ApiTestSuite::setup().await;
    let (alice, alice_token) = suite.signed_in("alice").await;
    let secret = suite.generate(alice, &alice_token).await["data"]["api_key_secret"]
        .as_str()
        .unwrap()
        .to_string();

    let db = suite.context.db.connection();
    let root = insert_user(db, "root", "rootpw", true).await.unwrap();
    let admin_token = suite.login("root", "rootpw").await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string();

    let deleted = suite.delete(i64::from(root), &secret, &admin_token).await;
    assert_eq!(deleted["code"], 0);

    let alice_uid = i32::try_from(alice).unwrap();
    assert_eq!(ak_num(db, alice_uid).await, 0);
    assert_eq!(ak_num(db, root).await, 0);

    assert_eq!(
        suite.list(alice, &alice_token).await["data"]["api_key_list"],
        json!([])
    );
}

#[tokio::test]
async fn key_list_alias_route() {
    let suite = ApiTestSuite::setup().await;
    let (uid, token) = suite.signed_in("alice").await;
    suite.generate(uid, &token).await;

    let uri = format!("/api/v1/user/{uid}/key/list");
    let (status, body) = suite.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["api_key_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn protected_routes_reject_bad_tokens() {
    let suite = ApiTestSuite::setup().await;
    let (uid, _) = suite.signed_in("alice").await;
    let uri = format!("/api/v1/user/{uid}/keys");
    let expected = json!({"code": 1, "status": "error", "message": "Token invalid"});

    let (status, body) = suite.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);

    let (status, body) = suite
        .send(Method::GET, &uri, Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn ping_and_health() {
    let suite = ApiTestSuite::setup().await;

    let (status, body) = suite.send(Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("pong".to_string()));

    let (status, body) = suite.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["database"], true);
}
