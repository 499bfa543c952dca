use chainreq::{Environment, HttpMethod, NetClient, ParameterEncoding, RequestBuilder, Settings};
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn test_settings(server: &MockServer) -> Settings {
    let mut settings = Settings::new();
    settings.set_host(Environment::Testing, server.uri());
    settings.set_environment(Environment::Testing);
    settings
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_get_parameters_sent_as_query_string() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust http"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = NetClient::new(test_settings(&server)).expect("client should build");
    let response = RequestBuilder::new("/search")
        .parameter("q", "rust http")
        .parameter("page", 2)
        .dispatch(&client)
        .await
        .expect("request should succeed");

    assert_eq!(response.status.as_u16(), 200);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_post_parameters_sent_as_json_body() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({
            "name": "Leanne Graham",
            "active": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let client = NetClient::new(test_settings(&server)).expect("client should build");
    let response = RequestBuilder::new("/users")
        .method(HttpMethod::Post)
        .parameter("name", "Leanne Graham")
        .parameter("active", true)
        .dispatch(&client)
        .await
        .expect("request should succeed");

    assert_eq!(response.status.as_u16(), 201);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_post_form_parameters_sent_urlencoded() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string("password=p%26ss&user=jane+doe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = NetClient::new(test_settings(&server)).expect("client should build");
    let response = RequestBuilder::new("/login")
        .method(HttpMethod::Post)
        .parameter("user", "jane doe")
        .parameter("password", "p&ss")
        .encoding(ParameterEncoding::FormUrlEncoded)
        .dispatch(&client)
        .await
        .expect("request should succeed");

    assert_eq!(response.status.as_u16(), 200);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_raw_body_sent_verbatim() {
    if !can_bind_localhost() {
        return;
    }

    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/raw"))
        .and(body_string("payload"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = NetClient::new(test_settings(&server)).expect("client should build");
    let response = RequestBuilder::new("/raw")
        .method(HttpMethod::Put)
        .body(b"payload".to_vec())
        .dispatch(&client)
        .await
        .expect("request should succeed");

    assert_eq!(response.status.as_u16(), 200);
}
