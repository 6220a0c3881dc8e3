//! Integration tests for `HyperClient` and `BlockingHyperClient` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use courier::{
    BasicAuth, Body, BodyModelDump, CamelCaseCodec, Error, ErrorRaiser, File, Header,
    HttpResponse, HyperClient, JsonRpcBuilder, JsonRpcIdGenerator, Query, ResponseBody,
    RestBuilder, Signature, args,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{
        body_json, body_string, body_string_contains, header, header_regex, method, path,
        query_param,
    },
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Post {
    id: u64,
    title: String,
}

#[derive(Debug, Clone, Serialize)]
struct NewPost {
    title: String,
    user_id: u64,
}

fn client(server: &MockServer) -> HyperClient {
    HyperClient::builder(server.uri())
        .user_agent("courier-tests")
        .build()
        .expect("client")
}

// ============================================================================
// REST
// ============================================================================

#[tokio::test]
async fn get_with_path_and_query() {
    let server = MockServer::start().await;
    let posts = vec![Post {
        id: 1,
        title: "hello".to_string(),
    }];

    Mock::given(method("GET"))
        .and(path("/users/7/posts"))
        .and(query_param("page", "2"))
        .and(query_param("tag", "rust"))
        .and(header("user-agent", "courier-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&posts))
        .expect(1)
        .mount(&server)
        .await;

    let list_posts = RestBuilder::new()
        .get("users/{user_id}/posts", vec![])
        .decorate(
            Signature::new("list_posts")
                .param::<u64>("user_id")
                .param_with_default::<u32>("page", 1)
                .param::<Option<String>>("tag")
                .returns::<Vec<Post>>(),
        )
        .expect("method");

    let client = client(&server);
    let result: Vec<Post> = list_posts
        .bind(&client)
        .call_as(&args!(user_id = 7, page = 2, tag = "rust"))
        .await
        .expect("posts");

    check!(result == posts);
}

#[tokio::test]
async fn null_query_values_are_not_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "crab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let search = RestBuilder::new()
        .get("search", vec![])
        .decorate(
            Signature::new("search")
                .param::<String>("q")
                .param_with_default::<Option<u32>>("limit", None),
        )
        .expect("method");

    let client = client(&server);
    search
        .bind(&client)
        .call(&args!(q = "crab"))
        .await
        .expect("search");

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(request.url.query() == Some("q=crab"));
}

#[tokio::test]
async fn post_json_body_with_codec() {
    let server = MockServer::start().await;
    let created = Post {
        id: 42,
        title: "new".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "new", "userId": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let create_post = RestBuilder::new()
        .request_body_dumper(CamelCaseCodec)
        .post("posts", vec![])
        .decorate(
            Signature::new("create_post")
                .param::<NewPost>("body")
                .returns::<Post>(),
        )
        .expect("method");

    let client = HyperClient::builder(server.uri()).build().expect("client");
    let body = NewPost {
        title: "new".to_string(),
        user_id: 3,
    };
    let result: Post = create_post
        .bind(&client)
        .call_as(&args!(body = body))
        .await
        .expect("created");

    check!(result == created);
}

#[tokio::test]
async fn client_dumper_applies_to_explicit_dump_stage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(body_json(json!({"title": "new", "userId": 3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7, "title": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let create_post = RestBuilder::new()
        .post(
            "posts",
            vec![Body::new("body").into(), BodyModelDump::from_client().into()],
        )
        .decorate(
            Signature::new("create_post")
                .param::<NewPost>("body")
                .returns::<Post>(),
        )
        .expect("method");
    check!(
        create_post.spec().request_chain()
            == vec![
                "Url(posts)",
                "Method(POST)",
                "Body(body)",
                "BodyModelDump(client)",
                "JsonDump",
                "FormQuery",
            ]
    );

    let client = HyperClient::builder(server.uri())
        .request_body_dumper(CamelCaseCodec)
        .build()
        .expect("client");
    let body = NewPost {
        title: "new".to_string(),
        user_id: 3,
    };
    let result: Post = create_post
        .bind(&client)
        .call_as(&args!(body = body))
        .await
        .expect("created");

    check!(result.id == 7);
}

#[tokio::test]
async fn object_body_without_json_dump_is_a_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("password=secret&user=ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let login = RestBuilder::new()
        .no_request_body_post_dump()
        .post("login", vec![Body::new("form").into()])
        .decorate(Signature::new("login").param::<Value>("form"))
        .expect("method");

    let client = client(&server);
    let body = login
        .bind(&client)
        .call(&args!(form = json!({"user": "ada", "password": "secret"})))
        .await
        .expect("login");

    check!(body == ResponseBody::Value(json!({"ok": true})));
}

#[tokio::test]
async fn file_upload_is_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/reports"))
        .and(query_param("title", "q3"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains("name=\"data\"; filename=\"report.csv\""))
        .and(body_string_contains("a,b,c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let upload = RestBuilder::new()
        .post("reports", vec![File::new("data").filename("report.csv").into()])
        .decorate(
            Signature::new("upload")
                .param::<String>("data")
                .param::<String>("title"),
        )
        .expect("method");

    let client = client(&server);
    upload
        .bind(&client)
        .call(&args!(data = "a,b,c", title = "q3"))
        .await
        .expect("upload");
}

#[tokio::test]
async fn headers_from_method_and_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("x-trace", "t-1"))
        .and(header("x-api-key", "k"))
        .and(header("authorization", "Basic YWRhOnB3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let me = RestBuilder::new()
        .get("me", vec![Header::with_template("X-Trace", "{trace}").into()])
        .decorate(Signature::new("me").param::<String>("trace"))
        .expect("method");

    let client = HyperClient::builder(server.uri())
        .transformer(Header::with_template("X-Api-Key", "k"))
        .transformer(BasicAuth::from_credentials("ada", "pw"))
        .build()
        .expect("client");
    me.bind(&client)
        .call(&args!(trace = "t-1"))
        .await
        .expect("me");
}

#[tokio::test]
async fn computed_query_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("offset", "40"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let items = RestBuilder::new()
        .get(
            "items",
            vec![
                Query::with_template(
                    "offset",
                    courier::Template::map2(("page", "size"), |page: u32, size: u32| page * size),
                )
                .into(),
            ],
        )
        .decorate(
            Signature::new("items")
                .param::<u32>("page")
                .param::<u32>("size"),
        )
        .expect("method");

    let client = client(&server);
    items
        .bind(&client)
        .call(&args!(page = 2, size = 20))
        .await
        .expect("items");

    let requests = server.received_requests().await.expect("recording");
    let_assert!([request] = requests.as_slice());
    check!(request.url.query() == Some("offset=40"));
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn client_error_with_decoded_body() {
    #[derive(Debug, Deserialize)]
    struct ApiError {
        message: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "no such user"})))
        .mount(&server)
        .await;

    let get_user = RestBuilder::new()
        .error_raiser(ErrorRaiser::new().need_body(true))
        .get("users/{id}", vec![])
        .decorate(Signature::new("get_user").param::<u64>("id"))
        .expect("method");

    let client = client(&server);
    let result = get_user.bind(&client).call(&args!(id = 1)).await;

    let_assert!(Err(err) = result);
    check!(err.is_client_error());
    check!(err.status() == Some(404));
    let_assert!(Some(Ok(api_error)) = err.decode_body::<ApiError>());
    check!(api_error.message == "no such user");
}

#[tokio::test]
async fn server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let ping = RestBuilder::new()
        .get("ping", vec![])
        .decorate(Signature::new("ping"))
        .expect("method");

    let client = client(&server);
    let result = ping.bind(&client).call(&args!()).await;

    let_assert!(Err(Error::ServerError { status, body, .. }) = result);
    check!(status == 502);
    check!(body == ResponseBody::NotLoaded);
}

#[tokio::test]
async fn accepted_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"found": false})))
        .mount(&server)
        .await;

    let lookup = RestBuilder::new()
        .error_raiser(ErrorRaiser::new().except_codes([200, 404]))
        .response_body_pre_load(courier::JsonLoad::new([200, 404]))
        .get("lookup", vec![])
        .decorate(Signature::new("lookup"))
        .expect("method");

    let client = client(&server);
    let body = lookup.bind(&client).call(&args!()).await.expect("accepted");
    check!(body == ResponseBody::Value(json!({"found": false})));
}

#[tokio::test]
async fn raw_response_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/a.txt"))
        .respond_with(ResponseTemplate::new(200).insert_header("etag", "\"v1\""))
        .mount(&server)
        .await;

    let stat = RestBuilder::new()
        .get("files/{name}", vec![])
        .decorate(
            Signature::new("stat")
                .param::<String>("name")
                .returns::<HttpResponse>(),
        )
        .expect("method");

    let client = client(&server);
    let response = stat
        .bind(&client)
        .call(&args!(name = "a.txt"))
        .await
        .expect("call")
        .into_response()
        .expect("kept response");

    check!(response.status_code == 200);
    check!(response.header("etag") == Some("\"v1\""));
    check!(response.url.ends_with("/files/a.txt"));
}

#[tokio::test]
async fn timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let slow = RestBuilder::new()
        .get("slow", vec![])
        .decorate(Signature::new("slow"))
        .expect("method");

    let client = HyperClient::builder(server.uri())
        .timeout(Duration::from_millis(50))
        .build()
        .expect("client");
    let result = slow.bind(&client).call(&args!()).await;

    let_assert!(Err(err) = result);
    check!(err.is_timeout());
}

#[tokio::test]
async fn invalid_arguments_send_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let get_user = RestBuilder::new()
        .get("users/{id}", vec![])
        .decorate(Signature::new("get_user").param::<u64>("id"))
        .expect("method");

    let client = client(&server);
    let result = get_user.bind(&client).call(&args!()).await;
    check!(let Err(Error::InvalidArguments(_)) = result);
}

// ============================================================================
// JSON-RPC
// ============================================================================

fn rpc() -> JsonRpcBuilder {
    JsonRpcBuilder::new()
        .url("rpc")
        .id_generator(JsonRpcIdGenerator::with(|| "req-1".to_string()))
}

#[tokio::test]
async fn json_rpc_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rpc"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "method": "subtract",
            "params": [42, 23],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "result": 19,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let subtract = rpc()
        .method("subtract", vec![])
        .decorate(
            Signature::new("subtract")
                .param::<[i64; 2]>("params")
                .returns::<i64>(),
        )
        .expect("method");

    let client = client(&server);
    let diff: i64 = subtract
        .bind(&client)
        .call_as(&args!([42, 23]))
        .await
        .expect("result");
    check!(diff == 19);
}

#[tokio::test]
async fn json_rpc_without_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"jsonrpc": "2.0", "id": "req-1", "method": "ping"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "result": "pong",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ping = rpc()
        .method("ping", vec![])
        .decorate(Signature::new("ping").returns::<String>())
        .expect("method");

    let client = client(&server);
    let pong: String = ping.bind(&client).call_as(&args!()).await.expect("pong");
    check!(pong == "pong");
}

#[tokio::test]
async fn json_rpc_error_member() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "error": {"code": -32601, "message": "Method not found"},
        })))
        .mount(&server)
        .await;

    let missing = rpc()
        .method("missing", vec![])
        .decorate(Signature::new("missing"))
        .expect("method");

    let client = client(&server);
    let result = missing.bind(&client).call(&args!()).await;

    let_assert!(Err(Error::JsonRpc { code, message, data }) = result);
    check!(code == -32601);
    check!(message == "Method not found");
    check!(data.is_none());
}

#[tokio::test]
async fn json_rpc_id_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": "other",
            "result": 1,
        })))
        .mount(&server)
        .await;

    let call = rpc()
        .method("call", vec![])
        .decorate(Signature::new("call"))
        .expect("method");

    let client = client(&server);
    let result = call.bind(&client).call(&args!()).await;

    let_assert!(Err(Error::JsonRpcIdMismatch { expected, actual }) = result);
    check!(expected == json!("req-1"));
    check!(actual == json!("other"));
}

// ============================================================================
// Blocking
// ============================================================================

#[test]
fn blocking_client_round_trip() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime");
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "title": "t"})))
            .expect(1)
            .mount(&server)
            .await;
        server
    });

    let get_post = RestBuilder::new()
        .get("posts/{id}", vec![])
        .decorate(Signature::new("get_post").param::<u64>("id").returns::<Post>())
        .expect("method");

    let client = HyperClient::builder(server.uri())
        .build_blocking()
        .expect("client");
    let post: Post = get_post
        .bind_blocking(&client)
        .call_as(&args!(id = 1))
        .expect("post");

    check!(
        post == Post {
            id: 1,
            title: "t".to_string()
        }
    );
    runtime.block_on(server.verify());
}
