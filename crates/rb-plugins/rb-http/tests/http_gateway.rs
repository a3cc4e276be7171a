use rb_core::error::AppError;
use rb_core::models::{CreateFolder, MoveFolder, PostStatus, UpdatePost, Visibility};
use rb_core::traits::BlogGateway;
use rb_http::HttpGateway;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer, token: Option<&str>) -> HttpGateway {
    HttpGateway::new(&format!("{}/api/v1", server.uri()), token, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn lists_root_folders_with_reshaped_keys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "folderId": 1, "name": "Rust", "parentId": null, "childCount": 2 },
            { "folderId": 2, "name": "Go", "parentId": null }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let roots = gateway(&server, Some("t0ken")).list_root_folders().await.unwrap();
    assert_eq!(roots.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(roots[0].has_children);
    assert!(!roots[1].has_children);
}

#[tokio::test]
async fn lists_children_of_a_folder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders/7/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "folderId": 8, "name": "Async", "parentId": 7 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let children = gateway(&server, None).list_child_folders(7).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].parent_id, Some(7));
}

#[tokio::test]
async fn creates_and_moves_folders_with_camel_case_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/folders"))
        .and(body_json(json!({ "name": "Drafts", "parentId": null })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "folderId": 11, "name": "Drafts", "parentId": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/folders/11/move"))
        .and(body_json(json!({ "parentId": 3 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "folderId": 11, "name": "Drafts", "parentId": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server, None);
    let created = gw
        .create_folder(&CreateFolder { name: "Drafts".into(), ..Default::default() })
        .await
        .unwrap();
    assert_eq!(created.id, 11);

    let moved = gw.move_folder(11, &MoveFolder { parent_id: Some(3) }).await.unwrap();
    assert_eq!(moved.parent_id, Some(3));
}

#[tokio::test]
async fn delete_accepts_an_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/folders/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/posts/9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server, None);
    gw.delete_folder(5).await.unwrap();
    gw.delete_post(9).await.unwrap();
}

#[tokio::test]
async fn lists_my_posts_with_paging_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/my"))
        .and(query_param("page", "1"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "postId": 21, "title": "One", "content": "...", "folderId": 3 },
                { "postId": 22, "title": "Two", "content": "...", "status": "PUBLISHED", "visibility": "PUBLIC" }
            ],
            "number": 1,
            "size": 10,
            "totalPages": 3,
            "totalElements": 22
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway(&server, None).list_my_posts(1, 10).await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].status, PostStatus::Draft);
    assert_eq!(page.content[1].visibility, Visibility::Public);
    assert_eq!((page.number, page.total_pages, page.total_elements), (1, 3, 22));
}

#[tokio::test]
async fn keeps_posts_with_unrecognised_status_or_visibility() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [
                { "postId": 1, "title": "a", "content": "", "status": "PUBLISHED" },
                {
                    "postId": 2, "title": "b", "content": "",
                    "status": "SCHEDULED", "visibility": "UNLISTED",
                    "author": { "userId": 42, "id": 42, "nickname": "Kim" },
                    "folder": { "folderId": 3, "id": 3, "name": "Rust" }
                }
            ],
            "totalElements": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = gateway(&server, None).list_my_posts(0, 20).await.unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.content[0].status, PostStatus::Published);
    assert_eq!(page.content[1].status, PostStatus::Other("SCHEDULED".into()));
    assert_eq!(page.content[1].visibility, Visibility::Other("UNLISTED".into()));
    assert_eq!(page.content[1].folder_id, Some(3));
    assert_eq!(page.content[1].author.as_ref().map(|a| a.id), Some(42));
}

#[tokio::test]
async fn tolerates_an_unpaginated_post_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "postId": 1, "title": "a", "content": "" }
        ])))
        .mount(&server)
        .await;

    let page = gateway(&server, None).list_my_posts(0, 20).await.unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!((page.number, page.size, page.total_elements), (0, 20, 0));
}

#[tokio::test]
async fn gets_updates_and_moves_posts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/id/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "postId": 4, "title": "Hello", "content": "World", "viewCount": 12
        })))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/posts/4"))
        .and(body_json(json!({ "title": "Hello again" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "postId": 4, "title": "Hello again", "content": "World"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/posts/4/move"))
        .and(body_json(json!({ "folderId": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "postId": 4, "title": "Hello again", "content": "World", "folderId": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gw = gateway(&server, None);
    let post = gw.get_post(4).await.unwrap();
    assert_eq!(post.view_count, 12);

    let update = UpdatePost { title: Some("Hello again".into()), ..Default::default() };
    assert_eq!(gw.update_post(4, &update).await.unwrap().title, "Hello again");

    assert_eq!(gw.move_post(4, None).await.unwrap().folder_id, None);
}

#[tokio::test]
async fn surfaces_http_errors_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/id/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("post not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server, None).get_post(404).await.unwrap_err();
    match err {
        AppError::Status { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "post not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reports_unexpected_shapes_as_decode_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/folders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "oops": true })))
        .mount(&server)
        .await;

    let err = gateway(&server, None).list_root_folders().await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}

#[tokio::test]
async fn reports_unreachable_backend_as_transport_error() {
    let server = MockServer::start().await;
    let gw = gateway(&server, None);
    drop(server);

    let err = gw.list_root_folders().await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn decode_error_names_the_bad_field_inside_a_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/posts/my"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "title": "missing its key" }],
            "totalElements": 1
        })))
        .mount(&server)
        .await;

    match gateway(&server, None).list_my_posts(0, 20).await.unwrap_err() {
        AppError::Decode(msg) => assert!(msg.contains("postId"), "{msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
