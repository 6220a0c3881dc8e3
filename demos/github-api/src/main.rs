//! GitHub API Example
//!
//! Demonstrates courier's declarative REST methods.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use courier::prelude::*;
use courier::RestParams;

// ============================================================================
// Data Types
// ============================================================================

/// A GitHub contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub contributions: u32,
}

/// A GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
}

/// Request to create a GitHub issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssue {
    pub title: String,
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// A GitHub issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u32,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
}

// ============================================================================
// Declarative API
// ============================================================================

/// GitHub API methods, declared once and bound to any client.
#[derive(Debug, Clone)]
pub struct GitHubApi {
    contributors: MethodBinder,
    get_repo: MethodBinder,
    create_issue: MethodBinder,
    list_issues: MethodBinder,
}

impl GitHubApi {
    pub fn new() -> courier::Result<Self> {
        let api = RestBuilder::new().with_params(
            vec![Header::with_template("Accept", "application/vnd.github+json").into()],
            RestParams::default(),
        );

        let contributors = api.get("repos/{owner}/{repo}/contributors", vec![]).decorate(
            Signature::new("contributors")
                .param::<String>("owner")
                .param::<String>("repo")
                .returns::<Vec<Contributor>>(),
        )?;

        let get_repo = api.get("repos/{owner}/{repo}", vec![]).decorate(
            Signature::new("get_repo")
                .param::<String>("owner")
                .param::<String>("repo")
                .returns::<Repository>(),
        )?;

        // GitHub answers 201 Created
        let create_issue = api
            .response_body_pre_load(JsonLoad::new([200, 201]))
            .post(
                "repos/{owner}/{repo}/issues",
                vec![Header::with_template("Authorization", "Bearer {token}").into()],
            )
            .decorate(
                Signature::new("create_issue")
                    .param::<String>("owner")
                    .param::<String>("repo")
                    .param::<CreateIssue>("body")
                    .param::<String>("token")
                    .returns::<Issue>(),
            )?;

        // Unclaimed parameters become query parameters, `None` is not sent
        let list_issues = api.get("repos/{owner}/{repo}/issues", vec![]).decorate(
            Signature::new("list_issues")
                .param::<String>("owner")
                .param::<String>("repo")
                .param_with_default::<Option<String>>("state", None)
                .param_with_default::<Option<u32>>("per_page", None)
                .param_with_default::<Option<u32>>("page", None)
                .returns::<Vec<Issue>>(),
        )?;

        Ok(Self {
            contributors,
            get_repo,
            create_issue,
            list_issues,
        })
    }

    pub async fn contributors(
        &self,
        client: &HyperClient,
        owner: &str,
        repo: &str,
    ) -> courier::Result<Vec<Contributor>> {
        self.contributors
            .bind(client)
            .call_as(&args!(owner = owner, repo = repo))
            .await
    }

    pub async fn get_repo(
        &self,
        client: &HyperClient,
        owner: &str,
        repo: &str,
    ) -> courier::Result<Repository> {
        self.get_repo
            .bind(client)
            .call_as(&args!(owner = owner, repo = repo))
            .await
    }

    pub async fn create_issue(
        &self,
        client: &HyperClient,
        owner: &str,
        repo: &str,
        issue: &CreateIssue,
        token: &str,
    ) -> courier::Result<Issue> {
        self.create_issue
            .bind(client)
            .call_as(&args!(owner = owner, repo = repo, body = issue, token = token))
            .await
    }

    pub async fn list_issues(
        &self,
        client: &HyperClient,
        owner: &str,
        repo: &str,
        state: Option<&str>,
        per_page: Option<u32>,
    ) -> courier::Result<Vec<Issue>> {
        self.list_issues
            .bind(client)
            .call_as(&args!(owner = owner, repo = repo, state = state, per_page = per_page))
            .await
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> courier::Result<()> {
    let api = GitHubApi::new()?;
    let github = HyperClient::builder("https://api.github.com")
        .user_agent("courier-github-demo/0.1.0")
        .build()?;

    println!("GitHub API client created!");
    println!("Base URL: {}", github.base_url());

    println!("\n=== Resolved pipelines ===");
    for (name, method) in [
        ("contributors", &api.contributors),
        ("get_repo", &api.get_repo),
        ("create_issue", &api.create_issue),
        ("list_issues", &api.list_issues),
    ] {
        println!("{name}:");
        println!("  request:  {:?}", method.spec().request_chain());
        println!("  response: {:?}", method.spec().response_chain());
    }

    // These calls would work against the real API
    println!("\n=== Example API calls ===");
    println!("api.contributors(&github, \"rust-lang\", \"rust\").await?");
    println!("api.get_repo(&github, \"rust-lang\", \"rust\").await?");
    println!("api.list_issues(&github, \"rust-lang\", \"rust\", Some(\"open\"), Some(10)).await?");

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    fn client(mock_server: &MockServer) -> HyperClient {
        HyperClient::builder(mock_server.uri())
            .build()
            .expect("client")
    }

    #[tokio::test]
    async fn test_contributors() {
        let mock_server = MockServer::start().await;

        let contributors = vec![
            Contributor {
                login: "user1".to_string(),
                contributions: 100,
            },
            Contributor {
                login: "user2".to_string(),
                contributions: 50,
            },
        ];

        Mock::given(method("GET"))
            .and(path("/repos/rust-lang/rust/contributors"))
            .and(header("Accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&contributors))
            .mount(&mock_server)
            .await;

        let api = GitHubApi::new().expect("api");
        let result = api
            .contributors(&client(&mock_server), "rust-lang", "rust")
            .await
            .expect("contributors");

        assert_eq!(result, contributors);
    }

    #[tokio::test]
    async fn test_get_repo() {
        let mock_server = MockServer::start().await;

        let repo = Repository {
            id: 724_712,
            name: "rust".to_string(),
            full_name: "rust-lang/rust".to_string(),
            description: Some("Empowering everyone to build reliable software".to_string()),
            stargazers_count: 100_000,
            forks_count: 12_000,
        };

        Mock::given(method("GET"))
            .and(path("/repos/rust-lang/rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&repo))
            .mount(&mock_server)
            .await;

        let api = GitHubApi::new().expect("api");
        let result = api
            .get_repo(&client(&mock_server), "rust-lang", "rust")
            .await
            .expect("repo");

        assert_eq!(result, repo);
    }

    #[tokio::test]
    async fn test_create_issue() {
        let mock_server = MockServer::start().await;

        let created = Issue {
            id: 1,
            number: 42,
            title: "Bug report".to_string(),
            body: Some("Something went wrong".to_string()),
            state: "open".to_string(),
        };

        Mock::given(method("POST"))
            .and(path("/repos/owner/repo/issues"))
            .and(header("Authorization", "Bearer secret"))
            .and(body_json(&CreateIssue {
                title: "Bug report".to_string(),
                body: Some("Something went wrong".to_string()),
                labels: vec![],
            }))
            .respond_with(ResponseTemplate::new(201).set_body_json(&created))
            .mount(&mock_server)
            .await;

        let api = GitHubApi::new().expect("api");
        let issue = CreateIssue {
            title: "Bug report".to_string(),
            body: Some("Something went wrong".to_string()),
            labels: vec![],
        };
        let result = api
            .create_issue(&client(&mock_server), "owner", "repo", &issue, "secret")
            .await
            .expect("issue");

        assert_eq!(result, created);
    }

    #[tokio::test]
    async fn test_list_issues_with_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues"))
            .and(query_param("state", "open"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Issue>::new()))
            .mount(&mock_server)
            .await;

        let api = GitHubApi::new().expect("api");
        let result = api
            .list_issues(&client(&mock_server), "owner", "repo", Some("open"), Some(10))
            .await
            .expect("issues");

        assert!(result.is_empty());

        let requests = mock_server.received_requests().await.expect("recording");
        let query = requests.first().and_then(|request| request.url.query());
        assert_eq!(query, Some("state=open&per_page=10"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let api = GitHubApi::new().expect("api");
        let err = api
            .get_repo(&client(&mock_server), "nobody", "nothing")
            .await
            .expect_err("404");

        assert!(err.is_client_error());
        assert_eq!(err.status(), Some(404));
    }
}
