use chainreq::{Environment, HttpMethod, NetClient, RequestBuilder, Settings};
use serde::Deserialize;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct User {
    name: String,
    email: String,
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[test]
fn test_version() {
    assert!(!chainreq::VERSION.is_empty());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_fluent_get_decodes_typed_value() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Leanne Graham",
            "email": "leanne@example.com"
        })))
        .mount(&server)
        .await;

    let mut settings = Settings::new();
    settings.set_host(Environment::Testing, server.uri());
    settings.set_environment(Environment::Testing);

    let client = NetClient::new(settings).expect("client should build");
    let user: User = RequestBuilder::new("/users/1")
        .method(HttpMethod::Get)
        .send(&client)
        .await
        .expect("request should succeed");

    assert_eq!(user.name, "Leanne Graham");
    assert_eq!(user.email, "leanne@example.com");
}
