//! Every resource accessor must hit its documented method and path, and pass
//! filters along the way the method requires.

use rips_api::api::{ApiClient, ApiError, LogKind, Params};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// How the `limit=5` filter reaches the server.
#[derive(Debug, Clone, Copy)]
enum Filter {
    None,
    Query,
    Body,
}

const ROUTES: &[(&str, &str, Filter)] = &[
    // Projects
    ("GET", "/projects/", Filter::Query),
    ("GET", "/projects/by/status/", Filter::None),
    ("DELETE", "/projects/", Filter::Query),
    ("POST", "/project/", Filter::Body),
    ("GET", "/project/1/", Filter::None),
    ("POST", "/project/1/", Filter::Body),
    ("DELETE", "/project/1/", Filter::None),
    ("GET", "/project/1/status/", Filter::None),
    ("GET", "/project/1/trend/", Filter::None),
    ("GET", "/project/1/report/", Filter::None),
    ("GET", "/project/1/filenames/", Filter::Query),
    ("GET", "/project/1/filename/2/", Filter::None),
    ("GET", "/project/1/functions/", Filter::Query),
    ("GET", "/project/1/function/2/", Filter::None),
    // Issues
    ("GET", "/project/1/issues/", Filter::Query),
    ("DELETE", "/project/1/issues/", Filter::Query),
    ("GET", "/project/1/issue/2/", Filter::None),
    ("POST", "/project/1/issue/2/", Filter::Body),
    ("DELETE", "/project/1/issue/2/", Filter::None),
    ("GET", "/project/1/issue/2/comments/", Filter::Query),
    ("GET", "/project/1/issue/2/lines/", Filter::Query),
    ("GET", "/project/1/issue/2/strings/", Filter::Query),
    ("GET", "/project/1/issues/comments/", Filter::Query),
    ("GET", "/project/1/issues/comment/3/", Filter::None),
    ("GET", "/project/1/issues/lines/", Filter::Query),
    ("GET", "/project/1/issues/line/3/", Filter::None),
    ("GET", "/project/1/issues/strings/", Filter::Query),
    ("GET", "/project/1/issues/string/3/", Filter::None),
    ("GET", "/project/1/issues/by/types/", Filter::None),
    ("GET", "/project/1/issues/by/type/3/", Filter::None),
    ("GET", "/project/1/issues/by/filenames/", Filter::None),
    ("GET", "/project/1/issues/by/filename/3/", Filter::None),
    ("GET", "/issues/types/", Filter::None),
    ("GET", "/issues/type/3/", Filter::None),
    // Users
    ("GET", "/users/", Filter::Query),
    ("POST", "/user/", Filter::Body),
    ("GET", "/user/4/", Filter::None),
    ("POST", "/user/4/", Filter::Body),
    ("DELETE", "/user/4/", Filter::None),
    ("POST", "/user/4/email/activation/", Filter::None),
    // Logs
    ("GET", "/logs/errors/", Filter::Query),
    ("DELETE", "/logs/errors/", Filter::Query),
    ("GET", "/logs/infos/", Filter::Query),
    ("DELETE", "/logs/infos/", Filter::Query),
    ("GET", "/logs/scans/", Filter::Query),
    ("DELETE", "/logs/scans/", Filter::Query),
    ("GET", "/stats/", Filter::None),
];

async fn mount_routes(server: &MockServer) {
    for &(verb, route, filter) in ROUTES {
        let mock = Mock::given(method(verb)).and(path(route));
        let mock = match filter {
            Filter::None => mock,
            Filter::Query => mock.and(query_param("limit", "5")),
            Filter::Body => mock.and(body_string_contains("name=\"limit\"")),
        };
        // The same body satisfies JSON, raw and scan status decoding
        mock.respond_with(ResponseTemplate::new(200).set_body_json(json!({"phase": 0, "percent": 100})))
            .expect(1)
            .named(format!("{verb} {route}"))
            .mount(server)
            .await;
    }
}

async fn call_every_accessor(client: &ApiClient, f: &Params) -> Result<(), ApiError> {
    let f = Some(f);

    client.get_projects(f).await?;
    client.get_projects_by_status().await?;
    client.delete_projects(f).await?;
    client.add_project(Params::new().with("limit", 5)).await?;
    client.get_project(1).await?;
    client.update_project(1, f).await?;
    client.delete_project(1).await?;
    client.get_project_status(1).await?;
    client.get_project_trend(1).await?;
    client.get_project_report(1).await?;
    client.get_project_filenames(1, f).await?;
    client.get_project_filename(1, 2).await?;
    client.get_project_functions(1, f).await?;
    client.get_project_function(1, 2).await?;

    client.get_project_issues(1, f).await?;
    client.delete_project_issues(1, f).await?;
    client.get_project_issue(1, 2).await?;
    client.update_project_issue(1, 2, f).await?;
    client.delete_project_issue(1, 2).await?;
    client.get_project_issue_comments(1, 2, f).await?;
    client.get_project_issue_lines(1, 2, f).await?;
    client.get_project_issue_strings(1, 2, f).await?;
    client.get_project_issues_comments(1, f).await?;
    client.get_project_issues_comment(1, 3).await?;
    client.get_project_issues_lines(1, f).await?;
    client.get_project_issues_line(1, 3).await?;
    client.get_project_issues_strings(1, f).await?;
    client.get_project_issues_string(1, 3).await?;
    client.get_project_issues_by_types(1).await?;
    client.get_project_issues_by_type(1, 3).await?;
    client.get_project_issues_by_filenames(1).await?;
    client.get_project_issues_by_filename(1, 3).await?;
    client.get_issue_types().await?;
    client.get_issue_type(3).await?;

    client.get_users(f).await?;
    client.add_user(&Params::new().with("limit", 5)).await?;
    client.get_user(4).await?;
    client.update_user(4, f).await?;
    client.delete_user(4).await?;
    client.send_user_email(4, "activation").await?;

    client.get_error_logs(f).await?;
    client.delete_logs(LogKind::Errors, f).await?;
    client.get_info_logs(f).await?;
    client.delete_logs(LogKind::Infos, f).await?;
    client.get_scan_logs(f).await?;
    client.delete_logs(LogKind::Scans, f).await?;
    client.get_stats().await?;

    Ok(())
}

#[tokio::test]
async fn test_every_accessor_hits_its_route_once() {
    let server = MockServer::start().await;
    mount_routes(&server).await;

    let client = ApiClient::new(server.uri()).unwrap();
    let filters = Params::new().with("limit", 5);
    call_every_accessor(&client, &filters).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), ROUTES.len());
    server.verify().await;
}

#[tokio::test]
async fn test_get_logs_by_kind_matches_shortcut() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logs/scans/"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    let filters = Params::new().with("limit", 5);
    client.get_logs(LogKind::Scans, Some(&filters)).await.unwrap();
    client.get_scan_logs(Some(&filters)).await.unwrap();
}

#[tokio::test]
async fn test_email_type_is_a_single_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/3/email/a%2F..%2Fb%3Fx/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(server.uri()).unwrap();
    client.send_user_email(3, "a/../b?x").await.unwrap();
}
